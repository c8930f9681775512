//! dirlist
//!
//! Serves files from a directory over HTTP. Requests that resolve to a
//! directory are answered with a JSON listing of everything beneath it
//! instead of an HTML index.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod listing;
pub mod logger;
pub mod server;
