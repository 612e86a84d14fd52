//! sørvør - zero config dev server for modern web applications.
//!
//! Point it at an HTML entry and it bundles the scripts the page references,
//! serves the output with single-page-app fallback, and reloads every open
//! browser when a source file changes. Point it at a script instead and it
//! keeps the bundled program running under node.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing
//! - [`config`] - Layered configuration (defaults, file, env, flags)
//! - [`dev`] - Bundler boundary, rendering, watching, serving
//! - [`commands`] - `dev` and `build`
//! - [`error`] - Error types with actionable hints
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal status output
//!
//! Live-reload broadcasting lives in the `sorvor-livereload` crate.
//!
//! # Example
//!
//! ```no_run
//! use sorvor_cli::{config::{ConfigOverrides, SorvorConfig}, error::Result};
//!
//! fn main() -> Result<()> {
//!     let config = SorvorConfig::load(&ConfigOverrides::default(), None)?;
//!     config.validate()?;
//!     println!("{}", config.server_url(config.port));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod pkgjson;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
