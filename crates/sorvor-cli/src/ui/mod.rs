//! Terminal output for people watching the dev server.
//!
//! Status lines go to stderr so they never mix with the output of a program
//! started in run mode, which inherits stdout.
//!
//! # Examples
//!
//! ```no_run
//! use sorvor_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("sørvør ready on http://localhost:1234");
//! ui::warning("src/app.js:3:7: Could not resolve \"react\"");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_outputs};
pub use messages::{debug, diagnostic, error, info, success, warning};

/// Check if color output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` enables them for non-terminals,
/// otherwise colors follow whether stderr is attended.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status lines are colored.
///
/// Should be called early in `main`, with the `--no-color` flag. Sets the
/// owo-colors override that every printer here goes through.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && should_use_color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::{OwoColorize, Stream};
    use serial_test::serial;

    fn painted() -> String {
        format!("{}", "x".if_supports_color(Stream::Stderr, |t| t.red()))
    }

    #[test]
    #[serial]
    fn test_should_use_color_no_color() {
        std::env::set_var("NO_COLOR", "1");
        std::env::remove_var("FORCE_COLOR");
        assert!(!should_use_color());
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial]
    fn test_should_use_color_force_color() {
        std::env::remove_var("NO_COLOR");
        std::env::set_var("FORCE_COLOR", "1");
        assert!(should_use_color());
        std::env::remove_var("FORCE_COLOR");
    }

    #[test]
    #[serial]
    fn test_init_colors_no_color_flag() {
        std::env::remove_var("NO_COLOR");
        std::env::set_var("FORCE_COLOR", "1");
        init_colors(true);
        assert_eq!(painted(), "x");
        init_colors(false);
        assert!(painted().contains("\u{1b}["));
        std::env::remove_var("FORCE_COLOR");
        owo_colors::unset_override();
    }

    #[test]
    #[serial]
    fn test_no_color_overrides_force() {
        std::env::set_var("NO_COLOR", "1");
        std::env::set_var("FORCE_COLOR", "1");
        assert!(!should_use_color());
        std::env::remove_var("NO_COLOR");
        std::env::remove_var("FORCE_COLOR");
    }
}
