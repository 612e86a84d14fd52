//! Command-line interface definition for sorvor.
//!
//! # Command Structure
//!
//! - `sorvor dev` - Serve the entry HTML with live reload, or run a script
//!   entry with node and restart it on changes
//! - `sorvor build` - One production build of the entry

mod commands;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command, DevArgs};
pub use validation::{parse_host, parse_port};

/// sørvør - a zero config dev server for modern web applications
#[derive(Parser, Debug)]
#[command(
    name = "sorvor",
    version,
    about = "A zero config dev server for modern web applications",
    long_about = "sørvør builds your entry with an external bundler (esbuild by default),\n\
                  serves the output with single-page-app fallback, and reloads every\n\
                  open browser tab whenever a source file changes."
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
