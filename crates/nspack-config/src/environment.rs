//! The environment record a build is assembled from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Target platform selector flags. Exactly one must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformFlags {
    #[serde(default)]
    pub android: bool,

    #[serde(default)]
    pub ios: bool,
}

/// Parameters supplied by whoever invokes the assembler.
///
/// Serialized keys are `android`, `ios`, `skip_code_generation`, `snapshot`
/// and `uglify`, so they line up one-to-one with `NSPACK_*` variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildEnvironment {
    #[serde(flatten)]
    pub platforms: PlatformFlags,

    /// Compile just-in-time from `main.ts` instead of the AOT entry
    #[serde(default)]
    pub skip_code_generation: bool,

    /// Generate a V8 startup snapshot of the vendor chunk
    #[serde(default, rename = "snapshot")]
    pub enable_snapshot: bool,

    /// Minify and mangle the emitted bundles
    #[serde(default, rename = "uglify")]
    pub enable_minify: bool,
}

impl BuildEnvironment {
    /// Environment targeting Android with every optional feature off.
    pub fn android() -> Self {
        Self {
            platforms: PlatformFlags {
                android: true,
                ios: false,
            },
            ..Self::default()
        }
    }

    /// Environment targeting iOS with every optional feature off.
    pub fn ios() -> Self {
        Self {
            platforms: PlatformFlags {
                android: false,
                ios: true,
            },
            ..Self::default()
        }
    }

    pub fn with_skip_code_generation(mut self, skip: bool) -> Self {
        self.skip_code_generation = skip;
        self
    }

    pub fn with_snapshot(mut self, enabled: bool) -> Self {
        self.enable_snapshot = enabled;
        self
    }

    pub fn with_minify(mut self, enabled: bool) -> Self {
        self.enable_minify = enabled;
        self
    }

    /// Create from serde_json::Value
    ///
    /// # Example
    ///
    /// ```
    /// use nspack_config::BuildEnvironment;
    /// use serde_json::json;
    ///
    /// let env = BuildEnvironment::from_value(json!({
    ///     "ios": true,
    ///     "skip_code_generation": true,
    ///     "uglify": true
    /// }))
    /// .unwrap();
    ///
    /// assert!(env.platforms.ios);
    /// assert!(env.skip_code_generation);
    /// assert!(env.enable_minify);
    /// assert!(!env.enable_snapshot);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
