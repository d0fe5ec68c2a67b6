//! Pluggable checks over an assembled configuration
//!
//! Assembly itself never validates. These checks are opt-in: structural
//! checks need nothing but the value, filesystem checks look at the project
//! directory the configuration points into.

use std::path::{Path, PathBuf};

use crate::config::BuildConfiguration;
use crate::entries::MAIN_SHEET;
use crate::error::{ConfigError, Result};
use crate::project::ProjectLayout;
use crate::rules::{RuleCategory, TransformChain, NGTOOLS_LOADER};
use crate::stages::BuildStage;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &BuildConfiguration) -> Result<()>;
}

/// Structural checks (no filesystem access)
///
/// # Example
///
/// ```
/// use nspack_config::{assemble, BuildEnvironment, ConfigValidator, ProjectLayout, StructureValidator};
///
/// let config = assemble(&BuildEnvironment::ios(), &ProjectLayout::new("/p")).unwrap();
/// StructureValidator.validate(&config).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureValidator;

impl ConfigValidator for StructureValidator {
    fn validate(&self, config: &BuildConfiguration) -> Result<()> {
        let rules = &config.module.rules;

        match (
            rules.position(RuleCategory::MainStylesheet),
            rules.position(RuleCategory::Stylesheet),
        ) {
            (Some(main), Some(generic)) if main > generic => {
                return Err(ConfigError::InvalidValue(format!(
                    "rule for {MAIN_SHEET} must precede the generic .css rule"
                )));
            }
            _ => {}
        }

        if let Some(generic) = rules.get(RuleCategory::Stylesheet) {
            if generic.applies_to(MAIN_SHEET) {
                return Err(ConfigError::InvalidValue(format!(
                    "generic .css rule must exclude {MAIN_SHEET}"
                )));
            }
        }

        let extracts = rules.iter().any(|rule| rule.chain.is_extracted());
        let has_extract_stage = config
            .stages
            .iter()
            .any(|stage| matches!(stage, BuildStage::ExtractText(_)));
        if extracts && !has_extract_stage {
            return Err(ConfigError::InvalidValue(
                "an extracting rule needs the ExtractTextPlugin stage".to_string(),
            ));
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Checks that every entry module and the compiler config referenced by the
/// configuration exist, collecting all missing files.
///
/// # Example
///
/// ```no_run
/// use nspack_config::{assemble, BuildEnvironment, ConfigValidator, FsValidator, ProjectLayout};
///
/// let project = ProjectLayout::new(".");
/// let config = assemble(&BuildEnvironment::android(), &project).unwrap();
/// FsValidator::new(project).validate(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FsValidator {
    project: ProjectLayout,
}

impl FsValidator {
    pub fn new(project: ProjectLayout) -> Self {
        Self { project }
    }

    /// Every file the configuration expects, paired with whether it resolves.
    pub fn required_files(&self, config: &BuildConfiguration) -> Vec<(PathBuf, bool)> {
        let mut files = Vec::new();

        for module in config.entries.values() {
            let path = config.context_root.join(module.trim_start_matches("./"));
            let found = resolves(&path, &config.resolve.extensions);
            files.push((path, found));
        }

        if let Some(tsconfig) = tsconfig_of(config) {
            let path = self.project.tsconfig_path(&tsconfig);
            let found = path.is_file();
            files.push((path, found));
        }

        files
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &BuildConfiguration) -> Result<()> {
        StructureValidator.validate(config)?;
        ensure_present(&self.required_files(config))
    }
}

/// Fails with [`ConfigError::MissingFiles`] naming every file in `files`
/// that was not found, in order.
pub fn ensure_present(files: &[(PathBuf, bool)]) -> Result<()> {
    let missing: Vec<PathBuf> = files
        .iter()
        .filter(|(_, found)| !found)
        .map(|(path, _)| path.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingFiles(missing))
    }
}

/// A module path resolves as written or with any of the resolver extensions.
fn resolves(path: &Path, extensions: &[String]) -> bool {
    path.is_file()
        || extensions.iter().any(|ext| {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(ext);
            Path::new(&candidate).is_file()
        })
}

fn tsconfig_of(config: &BuildConfiguration) -> Option<String> {
    let rule = config.module.rules.get(RuleCategory::TypeScript)?;
    let TransformChain::Steps(steps) = &rule.chain else {
        return None;
    };
    steps
        .iter()
        .find(|step| step.loader == NGTOOLS_LOADER)
        .and_then(|step| step.options.as_ref())
        .and_then(|options| options.get("tsConfigPath"))
        .and_then(|path| path.as_str())
        .map(str::to_string)
}

/// Convenience function for structural validation
pub fn validate_structure(config: &BuildConfiguration) -> Result<()> {
    StructureValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &BuildConfiguration, project: &ProjectLayout) -> Result<()> {
    FsValidator::new(project.clone()).validate(config)
}
