//! Conversion from CLI errors to miette reports for terminal output.
//!
//! Error messages carry their hint after a `\n\nHint: ` separator; here the
//! hint is moved into the diagnostic's help section.

use crate::error::{BuildError, CliError};
use miette::{MietteDiagnostic, Report};

const HINT_SEPARATOR: &str = "\n\nHint: ";

/// Convert a `CliError` into a miette report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => with_help(format!("Configuration error: {}", e)),
        CliError::Template(e) => {
            let detail = match (e.name(), e.line()) {
                (Some(name), Some(line)) => format!("{} ({} line {})", e, name, line),
                _ => e.to_string(),
            };
            with_help(format!(
                "Failed to render entry HTML: {}{}Use {{{{ esbuild(\"path\") }}}} and {{{{ livereload() }}}} in the template",
                detail, HINT_SEPARATOR
            ))
        }
        other => with_help(other.to_string()),
    }
}

/// Convert a `BuildError` into a miette report.
pub fn build_error_to_miette(err: BuildError) -> Report {
    with_help(err.to_string())
}

fn with_help(message: String) -> Report {
    match message.split_once(HINT_SEPARATOR) {
        Some((message, hint)) => Report::new(
            MietteDiagnostic::new(message.to_string()).with_help(hint.to_string()),
        ),
        None => Report::new(MietteDiagnostic::new(message)),
    }
}
