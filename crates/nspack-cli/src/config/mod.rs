//! Layered loading of the build environment.
//!
//! Priority: CLI flags > `NSPACK_*` variables > env file > defaults

mod loading;

pub use loading::{EnvOverrides, load_environment, resolve_env_file, resolve_project_root};

/// Env file picked up from the project root when --env-file is not given.
pub const DEFAULT_ENV_FILE: &str = "nspack.env.json";

/// Prefix for environment variables, e.g. `NSPACK_IOS=true`.
pub const ENV_PREFIX: &str = "NSPACK_";
