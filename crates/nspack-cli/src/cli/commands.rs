use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available nspack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble the configuration and print it as JSON
    ///
    /// The platform must be selected with --android or --ios, an env file or
    /// an NSPACK_ANDROID / NSPACK_IOS variable.
    Config(ConfigArgs),

    /// Assemble the configuration and check the project against it
    ///
    /// Reports entry modules and the tsconfig file that the configuration
    /// references but the project does not contain.
    Check(CheckArgs),
}

/// Build environment flags.
///
/// A flag that is not given leaves the value from the env file or the
/// `NSPACK_*` variables in place.
#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// Target Android
    #[arg(long, conflicts_with = "ios")]
    pub android: bool,

    /// Target iOS
    #[arg(long)]
    pub ios: bool,

    /// Compile just-in-time from main.ts instead of the AOT entry
    #[arg(long)]
    pub skip_code_generation: bool,

    /// Generate a V8 startup snapshot of the vendor chunk
    #[arg(long)]
    pub snapshot: bool,

    /// Minify and mangle the emitted bundles
    #[arg(long, alias = "minify")]
    pub uglify: bool,
}

/// Where the project lives and where extra settings come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root directory
    ///
    /// Defaults to the current directory.
    #[arg(short = 'p', long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// JSON file with environment values
    ///
    /// Without this flag, nspack.env.json in the project root is used when
    /// present.
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Write the configuration to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON on one line
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    #[command(flatten)]
    pub project: ProjectArgs,
}
