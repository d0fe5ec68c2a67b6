//! Config command implementation.
//!
//! Assembles the configuration and prints it as JSON.

use std::io::Write;

use nspack_config::assemble;
use tracing::info;

use crate::cli::ConfigArgs;
use crate::commands::prepare;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the config command.
///
/// The JSON goes to stdout unless `--output` names a file. Status lines go to
/// stderr so the output can be piped.
///
/// # Errors
///
/// Returns an error when the environment cannot be loaded, the platform is
/// missing or ambiguous, or the output cannot be written.
pub fn execute(args: ConfigArgs) -> Result<()> {
    let (project, env) = prepare(&args.env, &args.project)?;

    let config = assemble(&env, &project)?;
    let json = config.to_json(!args.compact)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_path(parent)?;
            }
            std::fs::write(path, format!("{json}\n")).with_path(path)?;
            info!(path = %path.display(), "configuration written");
            ui::success(&format!(
                "Wrote {} configuration to {}",
                config.platform(),
                path.display()
            ));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
