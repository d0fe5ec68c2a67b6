//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use super::colors_enabled;

fn emit(symbol: &str, message: &str, paint: fn(&str) -> String) {
    if colors_enabled() {
        eprintln!("{}", paint(&format!("{symbol} {message}")));
    } else {
        eprintln!("{symbol} {message}");
    }
}

/// Print a success message to stderr.
///
/// ```no_run
/// use nspack_cli::ui::success;
///
/// success("Configuration written to webpack.json");
/// ```
pub fn success(message: &str) {
    emit("✓", message, |line| line.green().to_string());
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    emit("ℹ", message, |line| line.blue().to_string());
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    emit("⚠", message, |line| line.yellow().to_string());
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    emit("✗", message, |line| line.red().bold().to_string());
}
