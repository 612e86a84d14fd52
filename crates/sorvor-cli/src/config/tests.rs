#[cfg(test)]
mod tests {
    use crate::cli::DevArgs;
    use crate::config::*;
    use crate::error::{BuildError, CliError, ConfigError};
    use serial_test::serial;
    use std::fs;
    use std::net::{IpAddr, Ipv4Addr, TcpListener};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("public")).unwrap();
        fs::write(temp.path().join("public/index.html"), "<html></html>").unwrap();
        temp
    }

    fn clear_env() {
        for key in ["SORVOR_PORT", "SORVOR_OUT_DIR", "SORVOR_HOST", "SORVOR_WATCH_IGNORE"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let temp = project();
        let config = SorvorConfig::load(&ConfigOverrides::default(), Some(temp.path())).unwrap();

        assert_eq!(config.entry, PathBuf::from("public/index.html"));
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1234);
        assert_eq!(config.bundler, "esbuild");
        assert_eq!(config.heartbeat_secs, 60);
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.cwd, temp.path().canonicalize().unwrap());
        assert!(config.is_html_entry());
        config.validate().unwrap();
    }

    #[test]
    #[serial]
    fn test_priority_cli_over_env_over_file() {
        clear_env();
        let temp = project();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"{ "port": 3000, "out_dir": "build", "host": "127.0.0.1" }"#,
        )
        .unwrap();

        std::env::set_var("SORVOR_PORT", "4000");
        std::env::set_var("SORVOR_OUT_DIR", "www");

        let overrides = ConfigOverrides {
            port: Some(5000),
            ..ConfigOverrides::default()
        };
        let config = SorvorConfig::load(&overrides, Some(temp.path()));
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.out_dir, PathBuf::from("www"));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    #[serial]
    fn test_overrides_from_dev_args() {
        clear_env();
        let temp = project();
        fs::write(temp.path().join("server.js"), "console.log(1)").unwrap();

        let args = DevArgs {
            entry: Some(PathBuf::from("server.js")),
            open: true,
            bundler_args: vec!["--platform=node".to_string()],
            ..DevArgs::default()
        };
        let config = SorvorConfig::load(&ConfigOverrides::from(&args), Some(temp.path())).unwrap();

        assert_eq!(config.entry, PathBuf::from("server.js"));
        assert!(config.open);
        assert_eq!(config.bundler_args, vec!["--platform=node"]);
        assert!(!config.is_html_entry());
    }

    #[test]
    #[serial]
    fn test_unknown_field_rejected() {
        clear_env();
        let temp = project();
        fs::write(temp.path().join(CONFIG_FILE), r#"{ "prot": 3000 }"#).unwrap();

        let err = SorvorConfig::load(&ConfigOverrides::default(), Some(temp.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_cwd() {
        let err = SorvorConfig::load(
            &ConfigOverrides::default(),
            Some(std::path::Path::new("/definitely/not/here")),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_missing_entry() {
        let temp = TempDir::new().unwrap();
        let config = SorvorConfig {
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CliError::Build(BuildError::EntryNotFound(_))));
    }

    #[test]
    fn test_validate_out_dir_is_root() {
        let temp = project();
        let config = SorvorConfig {
            out_dir: PathBuf::from("."),
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_heartbeat() {
        let temp = project();
        let config = SorvorConfig {
            heartbeat_secs: 0,
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("heartbeat_secs"));
    }

    #[test]
    fn test_validate_huge_heartbeat() {
        let temp = project();
        let config = SorvorConfig {
            heartbeat_secs: u64::MAX,
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "heartbeat_secs"
        ));

        let config = SorvorConfig {
            heartbeat_secs: MAX_HEARTBEAT_SECS,
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_huge_debounce() {
        let temp = project();
        let config = SorvorConfig {
            debounce_ms: MAX_DEBOUNCE_MS + 1,
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_validate_port_zero() {
        let temp = project();
        let config = SorvorConfig {
            port: 0,
            cwd: temp.path().to_path_buf(),
            ..SorvorConfig::default_config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "port"
        ));
    }

    #[test]
    #[serial]
    fn test_port_zero_from_env_is_rejected() {
        clear_env();
        let temp = project();
        std::env::set_var("SORVOR_PORT", "0");

        let config = SorvorConfig::load(&ConfigOverrides::default(), Some(temp.path())).unwrap();
        clear_env();

        assert_eq!(config.port, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths_resolve_against_cwd() {
        let config = SorvorConfig {
            cwd: PathBuf::from("/project"),
            ..SorvorConfig::default_config()
        };

        assert_eq!(config.entry_path(), PathBuf::from("/project/public/index.html"));
        assert_eq!(config.out_dir_path(), PathBuf::from("/project/dist"));
        assert_eq!(config.watch_root(), PathBuf::from("/project"));
    }

    #[test]
    fn test_server_url() {
        let mut config = SorvorConfig::default_config();
        assert_eq!(config.server_url(1234), "http://localhost:1234");

        config.host = "::1".to_string();
        assert_eq!(config.server_url(8080), "http://[::1]:8080");
    }

    #[test]
    fn test_bind_ip_localhost() {
        let config = SorvorConfig {
            host: "127.0.0.1".to_string(),
            ..SorvorConfig::default_config()
        };
        assert_eq!(config.bind_ip().unwrap(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_find_available_port_success() {
        let listener = match TcpListener::bind(("127.0.0.1", 0)) {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!("Skipping test_find_available_port_success: unable to bind socket ({})", err);
                return;
            }
        };
        let busy = listener.local_addr().unwrap().port();

        let addr = find_available_port(IpAddr::V4(Ipv4Addr::LOCALHOST), busy).unwrap();
        assert_ne!(addr.port(), busy);
        assert!(addr.port() > busy && addr.port() <= busy.saturating_add(10));
    }
}
