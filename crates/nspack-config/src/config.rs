//! The assembled bundler configuration.
//!
//! Assembly runs in two passes. The first builds every section and every
//! stage except the snapshot stage into an immutable base value. The second
//! builds the full stage list from that base (the snapshot stage embeds a
//! copy of it) and returns a new value carrying it. Neither pass mutates a
//! value that has already been handed out.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::descriptors::{NodeShims, OutputDescriptor, ResolveDescriptor, TargetDescriptor};
use crate::entries::{build_entries, EntryMap};
use crate::environment::BuildEnvironment;
use crate::error::{ConfigError, Result};
use crate::platform::{resolve_platform, Platform};
use crate::project::ProjectLayout;
use crate::rules::{build_rules, RuleSet};
use crate::stages::{BuildStage, StageComposer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleOptions {
    pub rules: RuleSet,
}

/// Complete configuration handed to the bundler.
///
/// Field names on the wire are the bundler's own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfiguration {
    #[serde(rename = "context")]
    pub context_root: PathBuf,

    #[serde(rename = "target")]
    pub target: TargetDescriptor,

    #[serde(rename = "entry")]
    pub entries: EntryMap,

    pub output: OutputDescriptor,

    pub resolve: ResolveDescriptor,

    pub node: NodeShims,

    pub module: ModuleOptions,

    #[serde(rename = "plugins")]
    pub stages: Vec<BuildStage>,
}

impl BuildConfiguration {
    /// First pass: everything except the stage that embeds the result.
    pub fn base(env: &BuildEnvironment, project: &ProjectLayout) -> Result<Self> {
        let platform = resolve_platform(env)?;
        Ok(Self::base_for_platform(platform, env, project))
    }

    fn base_for_platform(platform: Platform, env: &BuildEnvironment, project: &ProjectLayout) -> Self {
        let context_root = project.context_root();

        Self {
            target: TargetDescriptor::new(platform),
            entries: build_entries(env),
            output: OutputDescriptor::for_platform(project, platform),
            resolve: ResolveDescriptor::for_context(context_root.clone()),
            node: NodeShims::default(),
            module: ModuleOptions {
                rules: build_rules(env),
            },
            stages: StageComposer::new(platform, env, project).base_stages(),
            context_root,
        }
    }

    /// Returns `self` with its stage list replaced.
    pub fn with_stages(self, stages: Vec<BuildStage>) -> Self {
        Self { stages, ..self }
    }

    pub fn platform(&self) -> Platform {
        self.target.platform
    }

    pub fn stage(&self, name: &str) -> Option<&BuildStage> {
        self.stages.iter().find(|stage| stage.name() == name)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(BuildStage::name).collect()
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Render as JSON text, pretty-printed or compact.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Assemble the configuration for `env` in `project`.
///
/// Fails only when the environment does not select exactly one platform.
///
/// # Example
///
/// ```
/// use nspack_config::{assemble, BuildEnvironment, Platform, ProjectLayout};
///
/// let project = ProjectLayout::new("/work/demo");
/// let config = assemble(&BuildEnvironment::android(), &project).unwrap();
///
/// assert_eq!(config.platform(), Platform::Android);
/// assert_eq!(config.entries["bundle"], "./main.aot.ts");
/// assert_eq!(config.stages.len(), 8);
/// ```
pub fn assemble(env: &BuildEnvironment, project: &ProjectLayout) -> Result<BuildConfiguration> {
    let platform = resolve_platform(env)?;
    let base = BuildConfiguration::base_for_platform(platform, env, project);

    let stages = StageComposer::new(platform, env, project).build_stages(&base);
    debug!(
        base = base.stages.len(),
        total = stages.len(),
        "composed build stages"
    );

    let config = base.with_stages(stages);
    info!(
        platform = %platform,
        stages = config.stages.len(),
        "assembled build configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_carries_minify_but_not_snapshot() {
        let env = BuildEnvironment::ios().with_snapshot(true).with_minify(true);
        let base = BuildConfiguration::base(&env, &ProjectLayout::new("/p")).unwrap();
        assert_eq!(base.stages.len(), 10);
        assert!(base.stage("UglifyJsPlugin").is_some());
        assert!(base.stage("NativeScriptSnapshotPlugin").is_none());
    }

    #[test]
    fn final_stages_are_base_stages_plus_snapshot() {
        let env = BuildEnvironment::ios().with_snapshot(true).with_minify(true);
        let project = ProjectLayout::new("/p");
        let base = BuildConfiguration::base(&env, &project).unwrap();
        let config = assemble(&env, &project).unwrap();

        let mut without_snapshot = config.stages.clone();
        without_snapshot.remove(8);
        assert_eq!(without_snapshot, base.stages);
    }

    #[test]
    fn with_stages_keeps_other_sections() {
        let env = BuildEnvironment::ios();
        let base = BuildConfiguration::base(&env, &ProjectLayout::new("/p")).unwrap();
        let entries = base.entries.clone();

        let replaced = base.with_stages(Vec::new());
        assert!(replaced.stages.is_empty());
        assert_eq!(replaced.entries, entries);
    }

    #[test]
    fn assemble_propagates_platform_errors() {
        let err = assemble(&BuildEnvironment::default(), &ProjectLayout::new("/p")).unwrap_err();
        assert!(err.is_platform_error());
    }

    #[test]
    fn wire_field_names_match_bundler() {
        let config = assemble(&BuildEnvironment::android(), &ProjectLayout::new("/p")).unwrap();
        let value = config.to_value().unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(
            keys,
            ["context", "target", "entry", "output", "resolve", "node", "module", "plugins"]
        );
        assert_eq!(value["context"], json!("/p/app"));
        assert_eq!(value["resolve"]["alias"]["~"], json!("/p/app"));
        assert_eq!(value["plugins"][0]["name"], json!("ExtractTextPlugin"));
    }

    #[test]
    fn compact_and_pretty_render_the_same_value() {
        let config = assemble(&BuildEnvironment::ios(), &ProjectLayout::new("/p")).unwrap();
        let pretty: Value = serde_json::from_str(&config.to_json(true).unwrap()).unwrap();
        let compact: Value = serde_json::from_str(&config.to_json(false).unwrap()).unwrap();
        assert_eq!(pretty, compact);
    }
}
