//! Shared output helpers.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable result in the requested format.
///
/// Text mode falls back to pretty JSON; commands with a dedicated text
/// layout only call this in JSON mode.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        },
        OutputFormat::Text => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        },
    }
}

/// Progress message on stderr, text mode only.
pub fn info(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    eprintln!("{} {}", "→".blue(), message);
}

/// Completion message on stderr, text mode only.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    eprintln!("{} {}", "✓".green().bold(), message);
}
