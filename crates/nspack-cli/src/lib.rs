//! nspack CLI - webpack configurations for NativeScript bundles.
//!
//! This crate wraps [`nspack_config`] in a command-line tool: it gathers the
//! build environment from flags, `NSPACK_*` variables and an optional env
//! file, assembles the configuration and prints it as JSON.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`config`] - Layered environment loading (figment)
//! - [`commands`] - `config` and `check` command implementations
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status messages on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result, ResultExt, SettingsError};
