use crate::config::SorvorConfig;
use crate::error::{BuildError, ConfigError, Result};

/// Longest accepted heartbeat interval (one day).
pub const MAX_HEARTBEAT_SECS: u64 = 86_400;

/// Longest accepted debounce window (one minute).
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

impl SorvorConfig {
    /// Validate configuration before anything is built or served.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The entry file does not exist
    /// - The output directory is the watched directory itself
    /// - The port is zero
    /// - A timing or queue setting is zero or out of range
    /// - No bundler program is configured
    pub fn validate(&self) -> Result<()> {
        let entry = self.entry_path();
        if !entry.is_file() {
            return Err(BuildError::EntryNotFound(entry).into());
        }

        if self.bundler.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "bundler".to_string(),
                hint: "Set 'bundler' to a program such as esbuild".to_string(),
            }
            .into());
        }

        let watch_root = self.watch_root();
        if !watch_root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "watch_dir".to_string(),
                value: self.watch_dir.display().to_string(),
                hint: "Watched directory does not exist".to_string(),
            }
            .into());
        }

        if self.out_dir_path() == watch_root || self.out_dir_path() == self.cwd {
            return Err(ConfigError::InvalidValue {
                field: "out_dir".to_string(),
                value: self.out_dir.display().to_string(),
                hint: "Output must go to its own directory, e.g. dist".to_string(),
            }
            .into());
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: "0".to_string(),
                hint: "Port must be between 1 and 65535".to_string(),
            }
            .into());
        }

        for (field, value) in [
            ("debounce_ms", self.debounce_ms),
            ("heartbeat_secs", self.heartbeat_secs),
            ("queue_capacity", self.queue_capacity as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    hint: "Must be greater than zero".to_string(),
                }
                .into());
            }
        }

        for (field, value, max) in [
            ("debounce_ms", self.debounce_ms, MAX_DEBOUNCE_MS),
            ("heartbeat_secs", self.heartbeat_secs, MAX_HEARTBEAT_SECS),
        ] {
            if value > max {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    hint: format!("Must be at most {}", max),
                }
                .into());
            }
        }

        Ok(())
    }
}
