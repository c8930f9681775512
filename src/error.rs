//! Error types for request resolution and listing generation.

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;

/// Failure to map a URL path onto something under the served root
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("malformed request path: {0}")]
    BadPath(String),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("resolved outside the served root: {}", .0.display())]
    Outside(PathBuf),

    #[error("stat failed for {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadPath(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Outside(_) => StatusCode::NOT_FOUND,
            Self::Stat { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure to produce a listing body
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("failed to serialize listing: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("listing task failed: {0}")]
    Task(String),
}

impl ListingError {
    pub const fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
