//! Error handling for the sorvor CLI.
//!
//! Errors are split the same way failures are handled at runtime:
//!
//! - **Configuration errors** (`ConfigError`) are fatal at startup
//! - **Build errors** (`BuildError`) are fatal for `sorvor build` and for the
//!   initial render of the dev server, but only logged during watch mode
//! - **Everything else** is collected in `CliError`, the type every command
//!   returns and `main` turns into a miette report
//!
//! Bundler diagnostics are not errors at all: they travel as plain strings in
//! [`BuildOutput`](crate::dev::BuildOutput).
//!
//! # Example
//!
//! ```rust,no_run
//! use sorvor_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_entry(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Pass the entry HTML as the first argument")
//! }
//! ```

mod report;

pub use report::{build_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid values, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build errors (missing entry, bundler unavailable, failed bundles)
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON parsing errors (package.json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entry HTML template could not be parsed or rendered
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Live-reload broadcaster is gone
    #[error("Live reload error: {0}")]
    LiveReload(#[from] sorvor_livereload::LiveReloadError),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// No free port near the requested one
    #[error("Ports {first}-{last} are all in use\n\nHint: Pass --port to pick a different port")]
    NoFreePort {
        /// First port tried
        first: u16,
        /// Last port tried
        last: u16,
    },
}

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Entry file doesn't exist
    #[error("Entry point not found: {}\n\nHint: Pass the entry as the first argument or set 'entry' in sorvor.config.json", .0.display())]
    EntryNotFound(PathBuf),

    /// The bundler program could not be started
    #[error("Could not run bundler '{program}': {reason}\n\nHint: Install it (npm i -D esbuild) or point --bundler at an executable")]
    BundlerUnavailable {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        reason: String,
    },

    /// The bundler ran but reported errors
    #[error("Bundling {entry} failed with {errors} error(s)\n\nHint: Fix the errors above and run the build again")]
    Failed {
        /// Entry that failed
        entry: String,
        /// Number of error diagnostics
        errors: usize,
    },

    /// Failed to write an output file
    #[error("Failed to write {}: {reason}\n\nHint: Check output directory permissions", .path.display())]
    WriteFailed {
        /// File that could not be written
        path: PathBuf,
        /// Underlying error
        reason: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
