//! Miette diagnostic conversion for CLI errors.

use miette::Report;
use nspack_config::ConfigError;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a core ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NoTargetPlatform | ConfigError::ConflictingPlatforms(_) => {
            miette::miette!(
                help = "Select one platform with --android or --ios, or set NSPACK_ANDROID / NSPACK_IOS",
                "{}",
                err
            )
        }
        ConfigError::MissingFiles(ref missing) => {
            let list = missing
                .iter()
                .map(|path| format!("  - {}", path.display()))
                .collect::<Vec<_>>()
                .join("\n");
            miette::miette!(
                help = "Create the files or run from the project root with --project",
                "Project is missing required files:\n{}",
                list
            )
        }
        _ => miette::miette!("{}", err),
    }
}
