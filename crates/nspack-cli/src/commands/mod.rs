//! Command implementations for the nspack CLI.
//!
//! - [`config`] - Assemble and emit the configuration
//! - [`check`] - Verify the project against the assembled configuration

pub mod check;
pub mod config;

use std::path::PathBuf;

use nspack_config::{BuildEnvironment, ProjectLayout};
use tracing::debug;

use crate::cli::{EnvArgs, ProjectArgs};
use crate::config::{DEFAULT_ENV_FILE, load_environment, resolve_env_file, resolve_project_root};
use crate::error::Result;
use crate::ui;

pub use check::execute as check_execute;
pub use config::execute as config_execute;

/// Resolve the project and merge every settings layer into an environment.
pub(crate) fn prepare(
    env_args: &EnvArgs,
    project_args: &ProjectArgs,
) -> Result<(ProjectLayout, BuildEnvironment)> {
    let root: PathBuf = resolve_project_root(project_args)?;
    let env_file = resolve_env_file(project_args.env_file.as_deref(), &root)?;

    if let Some(explicit) = &project_args.env_file {
        let project_file = root.join(DEFAULT_ENV_FILE);
        if project_file.is_file() && std::path::absolute(explicit)? != project_file {
            ui::warning(&format!(
                "Ignoring {} because --env-file was given",
                project_file.display()
            ));
        }
    }

    let env = load_environment(env_args, env_file.as_deref())?;

    debug!(root = %root.display(), ?env, "build environment ready");
    Ok((ProjectLayout::new(root), env))
}
