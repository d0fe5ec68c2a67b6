//! Command-line interface definition for nspack.
//!
//! # Command Structure
//!
//! - `nspack config` - Assemble the webpack configuration and print it as JSON
//! - `nspack check` - Assemble, then verify the project has the files it needs

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, ConfigArgs, EnvArgs, ProjectArgs};

/// nspack - webpack configurations for NativeScript bundles
#[derive(Parser, Debug)]
#[command(
    name = "nspack",
    version,
    about = "Emit webpack configurations for NativeScript application bundles",
    long_about = "nspack assembles the webpack configuration a NativeScript Angular app is\n\
                  bundled with: entries, loader rules and the ordered plugin list for the\n\
                  selected platform, printed as JSON for the bundler to consume."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
