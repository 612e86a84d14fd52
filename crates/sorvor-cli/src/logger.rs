//! Logging setup for the sorvor CLI.
//!
//! Built on `tracing`. The dev server logs connection churn and rebuild
//! timing at debug level, so `--verbose` is the switch to reach for when a
//! browser does not reload.
//!
//! # Example
//!
//! ```rust,no_run
//! use sorvor_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting dev server");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "sorvor=debug,sorvor_cli=debug,sorvor_livereload=debug";
const QUIET_FILTER: &str = "sorvor=error,sorvor_cli=error,sorvor_livereload=error";
const DEFAULT_FILTER: &str = "sorvor=info,sorvor_cli=info,sorvor_livereload=info";

/// Initialize the global tracing subscriber.
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug for sorvor crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for sorvor crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
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
