//! Target platform resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::environment::BuildEnvironment;
use crate::error::{ConfigError, Result};

/// Mobile platform a bundle is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Every supported platform, in the order handed to the compiler plugin.
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    fn is_selected(self, env: &BuildEnvironment) -> bool {
        match self {
            Platform::Ios => env.platforms.ios,
            Platform::Android => env.platforms.android,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Android is checked before iOS.
const RESOLUTION_ORDER: [Platform; 2] = [Platform::Android, Platform::Ios];

/// Resolve the single active target platform.
///
/// Fails eagerly when no flag is set or when more than one is.
///
/// # Example
///
/// ```
/// use nspack_config::{resolve_platform, BuildEnvironment, Platform};
///
/// let platform = resolve_platform(&BuildEnvironment::ios()).unwrap();
/// assert_eq!(platform, Platform::Ios);
///
/// assert!(resolve_platform(&BuildEnvironment::default()).is_err());
/// ```
pub fn resolve_platform(env: &BuildEnvironment) -> Result<Platform> {
    let selected: Vec<Platform> = RESOLUTION_ORDER
        .into_iter()
        .filter(|platform| platform.is_selected(env))
        .collect();

    match selected.as_slice() {
        [] => Err(ConfigError::NoTargetPlatform),
        [platform] => {
            debug!(platform = %platform, "resolved target platform");
            Ok(*platform)
        }
        _ => Err(ConfigError::ConflictingPlatforms(selected)),
    }
}
