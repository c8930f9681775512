//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the directory listing responder, server header and access logging.

use crate::config::AppState;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{HeaderName, HeaderValue, IF_NONE_MATCH, RANGE, SERVER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        let header = |name: HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            path: parts.uri.path(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            range_header: header(RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type; request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    // Request bodies are never read
    let (parts, _) = req.into_parts();

    let (mut response, tag) = match check_http_method(&parts.method, state.config.http.enable_cors)
    {
        Some(resp) => (resp, None),
        None => {
            let ctx = RequestContext::from_parts(&parts);
            let handled = state.responder.handle(&ctx).await;
            (handled.response, handled.tag)
        }
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.tag = tag;
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = format!("{:?}", parts.version)
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}
