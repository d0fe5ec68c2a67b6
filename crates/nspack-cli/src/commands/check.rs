//! Check command implementation.
//!
//! Assembles the configuration, then confirms the project contains every
//! file it points at.

use nspack_config::{FsValidator, assemble, ensure_present, validate_structure};

use crate::cli::CheckArgs;
use crate::commands::prepare;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load the environment and assemble the configuration
/// 2. Check that the rule and plugin lists agree with each other
/// 3. Check that every entry module and the tsconfig file exist
///
/// # Errors
///
/// Returns [`nspack_config::ConfigError::MissingFiles`] listing every file
/// that is absent.
pub fn execute(args: CheckArgs) -> Result<()> {
    let (project, env) = prepare(&args.env, &args.project)?;

    ui::info(&format!("Checking {}", project.root().display()));
    let config = assemble(&env, &project)?;
    ui::success(&format!(
        "Configuration assembled for {} ({} plugins)",
        config.platform(),
        config.stages.len()
    ));

    validate_structure(&config)?;

    let files = FsValidator::new(project).required_files(&config);
    for (path, found) in &files {
        if *found {
            ui::success(&format!("  {} exists", path.display()));
        } else {
            ui::error(&format!("  {} not found", path.display()));
        }
    }

    ensure_present(&files)?;
    ui::success("Project is ready to bundle");
    Ok(())
}
