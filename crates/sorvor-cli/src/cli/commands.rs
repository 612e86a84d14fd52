use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::{parse_host, parse_port};

/// Available sorvor subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// An HTML entry is rendered into the output directory and served with
    /// live reload. Any other entry is bundled and run with node, and the
    /// process is restarted after every rebuild.
    Dev(DevArgs),

    /// Build for production
    ///
    /// Renders the entry HTML (or bundles a script entry) once with
    /// NODE_ENV set to "production" and without the live-reload client.
    Build(BuildArgs),
}

/// Arguments for the dev command
#[derive(Args, Debug, Default)]
pub struct DevArgs {
    /// Entry point (defaults to public/index.html)
    ///
    /// An .html file is treated as a template: {{ esbuild("app.js") }}
    /// bundles a script relative to it and {{ livereload() }} inserts the
    /// reload client.
    #[arg(value_name = "ENTRY")]
    pub entry: Option<PathBuf>,

    /// Host name to listen on (defaults to localhost)
    #[arg(long, value_name = "HOST", value_parser = parse_host)]
    pub host: Option<String>,

    /// Port for the dev server (defaults to 1234)
    ///
    /// If the port is busy the next free one (up to +10) is used.
    #[arg(short, long, value_name = "PORT", value_parser = parse_port)]
    pub port: Option<u16>,

    /// Output directory for built files (defaults to dist)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Bundler program to invoke (defaults to esbuild)
    #[arg(long, value_name = "PROGRAM")]
    pub bundler: Option<String>,

    /// Open the browser once the server is up
    #[arg(long)]
    pub open: bool,

    /// Project directory (defaults to the current directory)
    ///
    /// sorvor.config.json and package.json are read from here and all
    /// relative paths are resolved against it.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Extra arguments passed to the bundler as-is
    ///
    /// Example: sorvor dev -- --minify --sourcemap
    #[arg(last = true, value_name = "BUNDLER_ARGS")]
    pub bundler_args: Vec<String>,
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Entry point (defaults to public/index.html)
    #[arg(value_name = "ENTRY")]
    pub entry: Option<PathBuf>,

    /// Output directory for built files (defaults to dist)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Bundler program to invoke (defaults to esbuild)
    #[arg(long, value_name = "PROGRAM")]
    pub bundler: Option<String>,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Extra arguments passed to the bundler as-is
    #[arg(last = true, value_name = "BUNDLER_ARGS")]
    pub bundler_args: Vec<String>,
}
