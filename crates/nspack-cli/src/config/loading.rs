use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use nspack_config::BuildEnvironment;
use serde::Serialize;
use tracing::debug;

use crate::cli::{EnvArgs, ProjectArgs};
use crate::config::{DEFAULT_ENV_FILE, ENV_PREFIX};
use crate::error::{Result, SettingsError};

/// The flags that were actually given on the command line.
///
/// Unset fields are skipped when serialized so they never mask a value from
/// a lower layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnvOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_code_generation: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uglify: Option<bool>,
}

impl From<&EnvArgs> for EnvOverrides {
    /// A platform flag selects that platform and clears the other one, so
    /// `--ios` retargets a project whose env file says android.
    fn from(args: &EnvArgs) -> Self {
        let platform = |selected: bool, other: bool| match (selected, other) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };

        Self {
            android: platform(args.android, args.ios),
            ios: platform(args.ios, args.android),
            skip_code_generation: args.skip_code_generation.then_some(true),
            snapshot: args.snapshot.then_some(true),
            uglify: args.uglify.then_some(true),
        }
    }
}

/// Absolute project root: `--project` if given, else the working directory.
pub fn resolve_project_root(args: &ProjectArgs) -> Result<PathBuf> {
    let root = match &args.project {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };
    Ok(root)
}

/// The env file to read, if any.
///
/// An explicit path must exist. Otherwise `nspack.env.json` in the project
/// root is used when it is a file.
pub fn resolve_env_file(explicit: Option<&Path>, project_root: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(SettingsError::NotFound(path.to_path_buf()).into()),
        None => {
            let default_path = project_root.join(DEFAULT_ENV_FILE);
            Ok(default_path.is_file().then_some(default_path))
        }
    }
}

/// Merge defaults, the env file, `NSPACK_*` variables and CLI flags into a
/// [`BuildEnvironment`].
///
/// Platform selection is not checked here; assembly reports a missing or
/// ambiguous platform.
pub fn load_environment(args: &EnvArgs, env_file: Option<&Path>) -> Result<BuildEnvironment> {
    let mut figment = Figment::new().merge(Serialized::defaults(BuildEnvironment::default()));

    if let Some(path) = env_file {
        debug!(path = %path.display(), "reading env file");
        figment = figment.merge(Json::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    let overrides = EnvOverrides::from(args);
    debug!(?overrides, "command-line overrides");
    figment = figment.merge(Serialized::defaults(overrides));

    figment.extract().map_err(|e| {
        SettingsError::Invalid {
            message: e.to_string(),
            hint: "Values must be booleans, e.g. NSPACK_IOS=true or {\"ios\": true}".to_string(),
        }
        .into()
    })
}
