// Configuration module entry point
// Loads layered configuration and holds per-process state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, ListingConfig, ListingFormat, LoggingConfig, PerformanceConfig,
    ServerConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_ROOT,
};

/// Values given on the command line; they win over file and environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<String>,
    pub format: Option<ListingFormat>,
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "dirlist.toml" when no path specified
    pub fn load_from(
        config_path: &str,
        overrides: &Overrides,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DIRLIST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("listing.root", DEFAULT_ROOT)?
            .set_default("listing.format", ListingFormat::default().as_str())?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "tagged")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", HttpConfig::default().server_name)?
            .set_default("http.enable_cors", false)?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("listing.root", overrides.root.clone())?
            .set_override_option("listing.format", overrides.format.map(ListingFormat::as_str))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/dirlist", &Overrides::default()).unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.listing.root, ".");
        assert_eq!(cfg.listing.format, ListingFormat::Detailed);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "tagged");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            root: Some("/srv/files".to_string()),
            format: Some(ListingFormat::Split),
        };
        let cfg = Config::load_from("does-not-exist/dirlist", &overrides).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.listing.root, "/srv/files");
        assert_eq!(cfg.listing.format, ListingFormat::Split);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[listing]\nformat = \"names\"\n\n[performance]\nmax_connections = 16\n",
        )
        .unwrap();

        let base = dir.path().join("custom");
        let cfg = Config::load_from(base.to_str().unwrap(), &Overrides::default()).unwrap();
        assert_eq!(cfg.listing.format, ListingFormat::Names);
        assert_eq!(cfg.performance.max_connections, Some(16));
        assert_eq!(cfg.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_listing_format_parse() {
        assert_eq!("split".parse::<ListingFormat>(), Ok(ListingFormat::Split));
        assert_eq!("NAMES".parse::<ListingFormat>(), Ok(ListingFormat::Names));
        assert!("tree".parse::<ListingFormat>().is_err());
        assert!(ListingFormat::Detailed.wants_checksums());
        assert!(!ListingFormat::Split.wants_checksums());
    }
}
