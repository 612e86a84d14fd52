use crate::cli::{BuildArgs, DevArgs};
use crate::config::{defaults::*, SorvorConfig};
use crate::error::{ConfigError, Result, ResultExt};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr, TcpListener, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Name of the optional config file in the project directory.
pub const CONFIG_FILE: &str = "sorvor.config.json";

const ENV_PREFIX: &str = "SORVOR_";

// figment lowercases env keys after stripping the prefix
const ENV_KEYS: &[&str] = &[
    "entry",
    "out_dir",
    "host",
    "port",
    "bundler",
    "bundler_args",
    "watch_dir",
    "watch_ignore",
    "debounce_ms",
    "heartbeat_secs",
    "queue_capacity",
    "open",
];

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bundler_args: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub open: bool,
}

impl From<&DevArgs> for ConfigOverrides {
    fn from(args: &DevArgs) -> Self {
        Self {
            entry: args.entry.clone(),
            out_dir: args.out_dir.clone(),
            host: args.host.clone(),
            port: args.port,
            bundler: args.bundler.clone(),
            bundler_args: args.bundler_args.clone(),
            open: args.open,
        }
    }
}

impl From<&BuildArgs> for ConfigOverrides {
    fn from(args: &BuildArgs) -> Self {
        Self {
            entry: args.entry.clone(),
            out_dir: args.out_dir.clone(),
            bundler: args.bundler.clone(),
            bundler_args: args.bundler_args.clone(),
            ..Self::default()
        }
    }
}

impl SorvorConfig {
    /// Load configuration from multiple sources.
    ///
    /// `cwd` is the project directory (current directory when `None`); the
    /// config file is looked up there.
    pub fn load(overrides: &ConfigOverrides, cwd: Option<&Path>) -> Result<Self> {
        let cwd = match cwd {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let cwd = cwd.canonicalize().with_path(&cwd)?;

        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        let config_file = cwd.join(CONFIG_FILE);
        if config_file.is_file() {
            tracing::debug!("Loading {}", config_file.display());
            figment = figment.merge(Json::file(&config_file));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));
        figment = figment.merge(Serialized::defaults(overrides));

        let mut config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {} syntax and field types", CONFIG_FILE),
        })?;
        config.cwd = cwd;

        Ok(config)
    }

    /// Default configuration values.
    pub fn default_config() -> Self {
        Self {
            entry: default_entry(),
            out_dir: default_out_dir(),
            host: default_host(),
            port: default_port(),
            bundler: default_bundler(),
            bundler_args: Vec::new(),
            watch_dir: default_watch_dir(),
            watch_ignore: default_watch_ignore(),
            debounce_ms: default_debounce_ms(),
            heartbeat_secs: default_heartbeat_secs(),
            queue_capacity: default_queue_capacity(),
            open: false,
            cwd: PathBuf::new(),
        }
    }

    /// IP address the configured host resolves to, preferring IPv4.
    pub fn bind_ip(&self) -> Result<IpAddr> {
        let invalid = |hint: String| ConfigError::InvalidValue {
            field: "host".to_string(),
            value: self.host.clone(),
            hint,
        };

        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| invalid(format!("Could not resolve host: {}", e)))?
            .collect();

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .map(|addr| addr.ip())
            .ok_or_else(|| invalid("Host resolved to no addresses".to_string()).into())
    }
}

/// Find a free port, starting at `requested` and trying the next 10.
pub fn find_available_port(ip: IpAddr, requested: u16) -> Result<SocketAddr> {
    if requested < 1024 {
        crate::ui::warning(&format!(
            "Port {} is in privileged range, may require root access",
            requested
        ));
    }

    for offset in 0..=10u16 {
        let Some(port) = requested.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(ip, port);
        if TcpListener::bind(addr).is_ok() {
            if offset > 0 {
                crate::ui::warning(&format!(
                    "Port {} is busy, using port {} instead",
                    requested, port
                ));
            }
            return Ok(addr);
        }
    }

    Err(ConfigError::NoFreePort {
        first: requested,
        last: requested.saturating_add(10),
    }
    .into())
}
