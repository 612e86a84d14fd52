//! Status message functions for terminal output.
//!
//! Colors follow the owo-colors override set by [`super::init_colors`].

use owo_colors::{OwoColorize, Stream, Style};

/// Print a success message to stderr.
///
/// ```no_run
/// sorvor_cli::ui::success("Rebuilt in 42ms");
/// ```
pub fn success(message: &str) {
    eprintln!(
        "{} {}",
        "✓".if_supports_color(Stream::Stderr, |t| t.style(Style::new().green().bold())),
        message
    );
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!(
        "{} {}",
        "ℹ".if_supports_color(Stream::Stderr, |t| t.style(Style::new().blue().bold())),
        message
    );
}

/// Print a warning message to stderr.
///
/// Bundler diagnostics are reported through this.
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".if_supports_color(Stream::Stderr, |t| t.style(Style::new().yellow().bold())),
        message.if_supports_color(Stream::Stderr, |t| t.yellow())
    );
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        "✗".if_supports_color(Stream::Stderr, |t| t.style(Style::new().red().bold())),
        message.if_supports_color(Stream::Stderr, |t| t.red())
    );
}

/// Print a bundler diagnostic: `[ERROR]` lines as errors, anything else as
/// a warning.
pub fn diagnostic(message: &str) {
    if message.starts_with("[ERROR]") {
        error(message);
    } else {
        warning(message);
    }
}

/// Print a debug message to stderr (only if RUST_LOG is set).
pub fn debug(message: &str) {
    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    eprintln!(
        "{} {}",
        "◆".if_supports_color(Stream::Stderr, |t| t.dimmed()),
        message.if_supports_color(Stream::Stderr, |t| t.dimmed())
    );
}
