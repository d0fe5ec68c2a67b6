//! Error handling for the nspack CLI.
//!
//! - `CliError` is what every command returns
//! - `SettingsError` covers loading the build environment (env file,
//!   `NSPACK_*` variables)
//! - assembly and project check failures come from [`nspack_config::ConfigError`]
//!
//! # Example
//!
//! ```rust,no_run
//! use nspack_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn write_output(path: &Path, json: &str) -> Result<()> {
//!     std::fs::write(path, json).with_path(path)
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Assembly or project check failed
    #[error(transparent)]
    Config(#[from] nspack_config::ConfigError),

    /// The build environment could not be loaded
    #[error("Environment error: {0}")]
    Settings(#[from] SettingsError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while gathering the build environment.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Env file passed with --env-file doesn't exist
    #[error("Env file not found: {}\n\nHint: Check the --env-file path or drop the flag", .0.display())]
    NotFound(PathBuf),

    /// A layer produced a value of the wrong type
    #[error("Invalid environment: {message}\n\nHint: {hint}")]
    Invalid {
        /// What figment reported
        message: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nspack_config::ConfigError;

    #[test]
    fn test_settings_error_not_found() {
        let err = SettingsError::NotFound(PathBuf::from("nspack.env.json"));
        let msg = err.to_string();
        assert!(msg.contains("Env file not found"));
        assert!(msg.contains("nspack.env.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: CliError = ConfigError::NoTargetPlatform.into();
        assert_eq!(err.to_string(), ConfigError::NoTargetPlatform.to_string());
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/out/webpack.json").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_keeps_other_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));

        let err = result.with_path("/out/webpack.json").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
