//! HTTP response building module
//!
//! Builders for every status the server emits. None of them panic: a builder
//! error is logged and replaced by a bare response.

use super::cache::FILE_CACHE_CONTROL;
use super::range::ByteRange;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
};
use hyper::{Response, StatusCode};

pub type HttpResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, FILE_CACHE_CONTROL)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// Build 404 Not Found response with an empty body
pub fn build_404_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_FOUND, &e))
}

/// Build a plain-text error response (400, 403, 500)
pub fn build_error_response(status: StatusCode, message: &str) -> HttpResponse {
    let body = format!("{} {message}\n", status.as_u16());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain")
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| fallback(StatusCode::METHOD_NOT_ALLOWED, &e))
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type, Range")
            .header("Access-Control-Max-Age", "86400");
    }

    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NO_CONTENT, &e))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| fallback(StatusCode::RANGE_NOT_SATISFIABLE, &e))
}

/// Build 200 response carrying a directory listing
pub fn build_json_response(json: Vec<u8>, is_head: bool) -> HttpResponse {
    let content_length = json.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(json) };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 200 response carrying a whole file
pub fn build_file_response(
    data: Bytes,
    content_length: u64,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, FILE_CACHE_CONTROL)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: Bytes,
    range: ByteRange,
    total_size: u64,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, FILE_CACHE_CONTROL)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::PARTIAL_CONTENT, &e))
}

/// Log a builder error and return a bare response with the intended status
fn fallback(status: StatusCode, error: &hyper::http::Error) -> HttpResponse {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
