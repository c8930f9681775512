// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8100;
pub const DEFAULT_ROOT: &str = ".";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
        }
    }
}

/// What gets served and how directories are described
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Base directory every request path is resolved against
    pub root: String,
    /// JSON shape of directory listings
    pub format: ListingFormat,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            format: ListingFormat::default(),
        }
    }
}

/// JSON layout of a directory listing
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingFormat {
    /// `[{"name", "type", "sha1"}]`, files carry a SHA-1 digest
    #[default]
    Detailed,
    /// `[{"name"}]`
    Names,
    /// `{"folders": [{"name"}], "files": [{"name"}]}`
    Split,
}

impl ListingFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Names => "names",
            Self::Split => "split",
        }
    }

    /// Only the detailed shape reports digests
    pub const fn wants_checksums(self) -> bool {
        matches!(self, Self::Detailed)
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "names" => Ok(Self::Names),
            "split" => Ok(Self::Split),
            other => Err(format!(
                "unknown listing format '{other}' (expected detailed, names or split)"
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (tagged, combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "tagged".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: concat!("dirlist/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_cors: false,
        }
    }
}
