//! Access log format module
//!
//! Supports multiple log formats:
//! - `tagged` (default): `2024/01/02 15:04:05 LST /docs`
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::Local;
use serde::Serialize;

/// Tag for a request answered with file bytes
pub const TAG_TRANSFER: &str = "GET";
/// Tag for a request answered with a directory listing
pub const TAG_LISTING: &str = "LST";

/// Access log entry containing all request/response information
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// `GET` for a file transfer, `LST` for a listing, absent otherwise
    pub tag: Option<&'static str>,
    /// HTTP method
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            tag: None,
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Path plus query string, as the client sent it
    pub fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Format the entry; `None` when the format has nothing to say about it
    ///
    /// The tagged format only records file transfers and listings.
    pub fn format(&self, format: &str) -> Option<String> {
        match format {
            "tagged" => self.format_tagged(),
            "combined" => Some(self.format_combined()),
            "common" => Some(self.format_common()),
            "json" => serde_json::to_string(self).ok(),
            custom => Some(self.format_custom(custom)),
        }
    }

    fn format_tagged(&self) -> Option<String> {
        self.tag.map(|tag| {
            format!(
                "{} {tag} {}",
                self.time.format("%Y/%m/%d %H:%M:%S"),
                self.request_uri()
            )
        })
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "-" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"-\" \"{}\"",
            self.format_common(),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$tag`, `$request`, `$request_method`, `$request_uri`, `$status`,
    /// `$body_bytes_sent`, `$http_user_agent`, `$request_time` (seconds).
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and $request_uri before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace(
                "$time_local",
                &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            )
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$tag", self.tag.unwrap_or("-"))
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.request_uri())
            .replace("$request", &self.request_line())
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}
