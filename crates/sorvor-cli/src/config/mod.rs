//! Configuration for sorvor with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and
//! `sorvor.config.json` in the project directory.
//! Priority: CLI > Environment (`SORVOR_*`) > File > Defaults

mod defaults;
mod loading;
mod tests;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::*;
pub use loading::{find_available_port, ConfigOverrides, CONFIG_FILE};
pub use validation::{MAX_DEBOUNCE_MS, MAX_HEARTBEAT_SECS};

/// Resolved sorvor configuration.
///
/// Relative paths are interpreted against [`cwd`](SorvorConfig::cwd); use the
/// `*_path` accessors to get them resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SorvorConfig {
    /// Entry file: an HTML template or a script to run with node
    #[serde(default = "default_entry")]
    pub entry: PathBuf,

    /// Output directory for built files
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Host name the dev server listens on
    #[serde(default = "default_host")]
    pub host: String,

    /// Preferred dev server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bundler program
    #[serde(default = "default_bundler")]
    pub bundler: String,

    /// Extra arguments passed to the bundler
    #[serde(default)]
    pub bundler_args: Vec<String>,

    /// Directory watched for changes
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Watch ignore patterns: directory names, or `*.ext` for extensions
    #[serde(default = "default_watch_ignore")]
    pub watch_ignore: Vec<String>,

    /// Quiet period that ends a burst of file changes, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Heartbeat period for live-reload connections, in seconds
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Per-connection live-reload queue size
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Open the browser once the server is up
    #[serde(default)]
    pub open: bool,

    /// Project directory, set while loading
    #[serde(skip)]
    pub cwd: PathBuf,
}

impl SorvorConfig {
    /// Entry file resolved against the project directory.
    pub fn entry_path(&self) -> PathBuf {
        self.resolve(&self.entry)
    }

    /// Output directory resolved against the project directory.
    pub fn out_dir_path(&self) -> PathBuf {
        self.resolve(&self.out_dir)
    }

    /// Watched directory resolved against the project directory.
    pub fn watch_root(&self) -> PathBuf {
        self.resolve(&self.watch_dir)
    }

    /// Whether the entry is an HTML template (serve mode) rather than a script (run mode).
    pub fn is_html_entry(&self) -> bool {
        self.entry
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
    }

    /// Heartbeat period for the live-reload broadcaster.
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    /// Debounce window for the file watcher.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// URL shown to the user for a bound port.
    pub fn server_url(&self, port: u16) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}", self.host, port)
        } else {
            format!("http://{}:{}", self.host, port)
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.as_os_str() == "." {
            self.cwd.clone()
        } else {
            self.cwd.join(path)
        }
    }
}
