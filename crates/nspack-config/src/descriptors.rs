//! Fixed-shape sections of the bundler configuration.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::platform::Platform;
use crate::project::ProjectLayout;

/// Runtime the bundles are emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    pub runtime: &'static str,
    pub platform: Platform,
}

impl TargetDescriptor {
    pub const RUNTIME: &'static str = "nativescript";

    pub fn new(platform: Platform) -> Self {
        Self {
            runtime: Self::RUNTIME,
            platform,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDescriptor {
    pub pathinfo: bool,
    pub path: PathBuf,
    pub library_target: String,
    pub filename: String,
}

impl OutputDescriptor {
    pub fn for_platform(project: &ProjectLayout, platform: Platform) -> Self {
        Self {
            pathinfo: true,
            path: project.app_output_path(platform),
            library_target: "commonjs2".to_string(),
            filename: "[name].js".to_string(),
        }
    }
}

/// Module resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveDescriptor {
    pub extensions: Vec<String>,

    /// Searched in order; core modules shadow everything else
    pub modules: Vec<String>,

    pub alias: IndexMap<String, PathBuf>,

    /// Off so `npm link`ed packages resolve at their link location
    pub symlinks: bool,
}

pub const PROJECT_ROOT_ALIAS: &str = "~";

impl ResolveDescriptor {
    pub fn for_context(context_root: PathBuf) -> Self {
        let mut alias = IndexMap::new();
        alias.insert(PROJECT_ROOT_ALIAS.to_string(), context_root);

        Self {
            extensions: [".js", ".ts", ".css"].map(String::from).to_vec(),
            modules: ["node_modules/tns-core-modules", "node_modules"]
                .map(String::from)
                .to_vec(),
            alias,
            symlinks: false,
        }
    }
}

/// How a Node.js core module is polyfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShim {
    /// No polyfill at all
    Disabled,
    /// Replaced by an empty module
    Empty,
}

impl Serialize for NodeShim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Empty => serializer.serialize_str("empty"),
        }
    }
}

/// Node.js shims that would conflict with the NativeScript runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeShims(IndexMap<String, NodeShim>);

impl NodeShims {
    pub fn get(&self, module: &str) -> Option<NodeShim> {
        self.0.get(module).copied()
    }
}

impl Default for NodeShims {
    fn default() -> Self {
        let shims = [
            ("http", NodeShim::Disabled),
            ("timers", NodeShim::Disabled),
            ("setImmediate", NodeShim::Disabled),
            ("fs", NodeShim::Empty),
        ];
        Self(
            shims
                .into_iter()
                .map(|(module, shim)| (module.to_string(), shim))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_descriptor_shape() {
        let project = ProjectLayout::new("/proj");
        let output = OutputDescriptor::for_platform(&project, Platform::Android);
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "pathinfo": true,
                "path": "/proj/platforms/android/src/main/assets/app",
                "libraryTarget": "commonjs2",
                "filename": "[name].js"
            })
        );
    }

    #[test]
    fn resolve_searches_core_modules_first() {
        let resolve = ResolveDescriptor::for_context(PathBuf::from("/proj/app"));
        assert_eq!(resolve.modules[0], "node_modules/tns-core-modules");
        assert_eq!(resolve.modules[1], "node_modules");
        assert_eq!(resolve.alias["~"], PathBuf::from("/proj/app"));
        assert!(!resolve.symlinks);
    }

    #[test]
    fn node_shims_serialize_as_false_or_empty() {
        assert_eq!(
            serde_json::to_value(NodeShims::default()).unwrap(),
            json!({ "http": false, "timers": false, "setImmediate": false, "fs": "empty" })
        );
    }

    #[test]
    fn target_names_platform() {
        assert_eq!(
            serde_json::to_value(TargetDescriptor::new(Platform::Ios)).unwrap(),
            json!({ "runtime": "nativescript", "platform": "ios" })
        );
    }
}
