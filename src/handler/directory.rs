//! Directory listing responder
//!
//! Walks a resolved directory on the blocking pool and answers with the JSON
//! listing. Either the whole body is produced or an error is returned; nothing
//! is written on failure.

use crate::config::ListingFormat;
use crate::error::ListingError;
use crate::http::{self, HttpResponse};
use crate::listing;
use std::path::PathBuf;

/// Build the listing response for `dir`
pub async fn serve_listing(
    dir: PathBuf,
    format: ListingFormat,
    is_head: bool,
) -> Result<HttpResponse, ListingError> {
    let json = tokio::task::spawn_blocking(move || listing::build(&dir, format).to_json())
        .await
        .map_err(|e| ListingError::Task(e.to_string()))??;

    Ok(http::build_json_response(json, is_head))
}
