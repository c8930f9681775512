//! Request handler module
//!
//! [`DirListing`] decides, per request, whether the path names a file (bytes
//! are sent as-is) or a directory (a JSON listing is sent). The router wraps
//! it with method checks and access logging.

pub mod directory;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use resolve::{clean_request_path, Target};
pub use router::{handle_request, RequestContext};

use crate::config::{ListingConfig, ListingFormat};
use crate::error::ResolveError;
use crate::http::{self, HttpResponse};
use crate::logger::{self, TAG_LISTING, TAG_TRANSFER};
use hyper::StatusCode;
use std::io;
use std::path::{Path, PathBuf};

/// Response plus the access-log tag describing what was served
#[derive(Debug)]
pub struct Handled {
    pub response: HttpResponse,
    pub tag: Option<&'static str>,
}

impl Handled {
    const fn tagged(response: HttpResponse, tag: &'static str) -> Self {
        Self {
            response,
            tag: Some(tag),
        }
    }

    const fn untagged(response: HttpResponse) -> Self {
        Self {
            response,
            tag: None,
        }
    }
}

/// File server answering directory requests with JSON listings
#[derive(Debug, Clone)]
pub struct DirListing {
    root: PathBuf,
    canonical_root: PathBuf,
    format: ListingFormat,
}

impl DirListing {
    /// Fails if the root does not exist or is not a directory
    pub fn new(config: &ListingConfig) -> io::Result<Self> {
        let root = PathBuf::from(&config.root);
        let canonical_root = root.canonicalize()?;
        if !canonical_root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("served root is not a directory: {}", root.display()),
            ));
        }
        Ok(Self {
            root,
            canonical_root,
            format: config.format,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the request path and serve whatever it points at
    pub async fn handle(&self, ctx: &RequestContext<'_>) -> Handled {
        let target = match resolve::resolve(&self.root, &self.canonical_root, ctx.path).await {
            Ok(t) => t,
            Err(e) => return Handled::untagged(resolve_failure(&e)),
        };

        match target {
            Target::File { path, metadata } => {
                match static_files::serve_file(ctx, &path, &metadata).await {
                    Ok(response) => Handled::tagged(response, TAG_TRANSFER),
                    Err(e) => {
                        logger::log_error(&format!(
                            "Failed to read file '{}': {e}",
                            path.display()
                        ));
                        let status = if e.kind() == io::ErrorKind::PermissionDenied {
                            StatusCode::FORBIDDEN
                        } else {
                            StatusCode::INTERNAL_SERVER_ERROR
                        };
                        Handled::untagged(http::build_error_response(status, "cannot read file"))
                    }
                }
            }
            Target::Directory(dir) => {
                match directory::serve_listing(dir, self.format, ctx.is_head).await {
                    Ok(response) => Handled::tagged(response, TAG_LISTING),
                    Err(e) => {
                        logger::log_error(&format!("Listing for '{}' failed: {e}", ctx.path));
                        Handled::untagged(http::build_error_response(
                            e.status(),
                            "cannot produce listing",
                        ))
                    }
                }
            }
        }
    }
}

fn resolve_failure(error: &ResolveError) -> HttpResponse {
    match error {
        ResolveError::NotFound(_) => http::build_404_response(),
        ResolveError::Outside(path) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {}",
                path.display()
            ));
            http::build_404_response()
        }
        ResolveError::BadPath(_) => http::build_error_response(error.status(), "malformed path"),
        ResolveError::Stat { .. } => {
            logger::log_error(&error.to_string());
            http::build_error_response(error.status(), "cannot stat requested path")
        }
    }
}
