//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Per-request access logging (`GET`/`LST` tagged lines by default)
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, TAG_LISTING, TAG_TRANSFER};

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn timestamped(message: &str) -> String {
    format!("{} {message}", Local::now().format("%Y/%m/%d %H:%M:%S"))
}

/// Write to info/access log
fn write_info(message: &str) {
    let line = timestamped(message);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    let line = timestamped(message);
    match writer::get() {
        Some(w) => w.write_error(&line),
        None => eprintln!("{line}"),
    }
}

/// Write to access log, line already formatted
fn write_access(line: &str) {
    match writer::get() {
        Some(w) => w.write_access(line),
        None => println!("{line}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    write_info(&format!("Serving {} on HTTP port: {}", root.display(), addr.port()));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Listing format: {}", config.listing.format));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
}

pub fn log_server_stop(active_connections: usize) {
    write_info(&format!(
        "Shutting down, {active_connections} connection(s) still finishing"
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    if let Some(line) = entry.format(format) {
        write_access(&line);
    }
}
