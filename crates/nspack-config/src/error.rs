//! Error types for configuration assembly and project checks.

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::Platform;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Platform resolution errors (the only assembly failures)
    #[error("no target platform: pass exactly one of --android or --ios")]
    NoTargetPlatform,

    #[error("conflicting target platforms: {}", format_platforms(.0))]
    ConflictingPlatforms(Vec<Platform>),

    // Filesystem contract errors (for `check` use)
    #[error("{} required project file(s) missing: {}", .0.len(), format_paths(.0))]
    MissingFiles(Vec<PathBuf>),

    // Environment parsing errors
    #[error("invalid environment value: {0}")]
    InvalidValue(String),
}

impl ConfigError {
    /// True for the errors raised while resolving the target platform.
    pub fn is_platform_error(&self) -> bool {
        matches!(
            self,
            Self::NoTargetPlatform | Self::ConflictingPlatforms(_)
        )
    }
}

fn format_platforms(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
