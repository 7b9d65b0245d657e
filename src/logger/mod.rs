//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging in common, combined or custom formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
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

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Operator banner, printed once the listener is bound
pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    for line in banner_lines(addr.port(), &config.http.site_name) {
        write_info(&line);
    }
    write_info(&format!("[Config] Listening on: {addr}"));
    write_info(&format!("[Config] Root directory: {}", root.display()));
    write_info(&format!(
        "[Config] Directory listing: {}",
        if config.http.directory_listing { "on" } else { "off" }
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[Config] Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[Config] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[Config] Error log: {path}"));
    }
}

fn banner_lines(port: u16, site_name: &str) -> [String; 2] {
    [
        format!("Serving {site_name} frontend at http://localhost:{port}"),
        "Open this URL in your browser to use the bridge interface".to_string(),
    ]
}

pub fn log_shutdown(addr: &SocketAddr) {
    write_info(&format!("[Shutdown] Stopped listening on {addr}"));
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
    write_access(&entry.format(format));
}
