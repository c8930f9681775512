//! HTTP cache validation
//!
//! `ETag` generation and `If-None-Match` matching for served files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// `Cache-Control` value sent with file transfers
pub const FILE_CACHE_CONTROL: &str = "public, max-age=3600";

/// Weak validator derived from file size and modification time.
///
/// Cheap to compute without reading the file, changes whenever either does.
pub fn generate_etag(len: u64, modified: Option<SystemTime>) -> String {
    let mut hasher = DefaultHasher::new();
    len.hash(&mut hasher);
    modified
        .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .hash(&mut hasher);
    format!("\"{:x}-{len:x}\"", hasher.finish())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Accepts a single tag, a comma separated list, or `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == etag || e == "*" || e.strip_prefix("W/") == Some(etag))
    })
}
