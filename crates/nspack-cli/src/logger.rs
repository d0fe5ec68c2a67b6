//! Logging infrastructure for the nspack CLI.
//!
//! Diagnostics go to stderr through `tracing`, so stdout stays clean for the
//! emitted JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use nspack_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Assembling configuration");
//! debug!(platform = "android", "resolved target platform");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "nspack_cli=debug,nspack_config=debug";
const QUIET_FILTER: &str = "nspack_cli=error,nspack_config=error";
const DEFAULT_FILTER: &str = "nspack_cli=info,nspack_config=warn";

/// Initialize the tracing subscriber with the specified options.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: DEBUG for nspack crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG` environment variable
/// 4. Default: INFO for the CLI, WARN for the assembler
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    install(filter_for(verbose, quiet), no_color);
}

fn install(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
