//! Logger module
//!
//! Provides logging utilities for the server:
//! - Startup banner
//! - The per-request wasm diagnostic
//! - Access logging
//! - Error and warning logging
//!
//! Info goes to stdout, errors and the access log to stderr.

mod format;

pub use format::AccessLogEntry;

use crate::config::ServerConfig;

/// Write to info log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Startup banner lines; the last one ends in a newline so a blank line follows
pub fn banner_lines(port: u16) -> [String; 4] {
    [
        format!("Server starting on port {port}"),
        format!("Visit http://localhost:{port}"),
        "WASM files will be served with correct MIME type".to_string(),
        "Press Ctrl+C to stop\n".to_string(),
    ]
}

/// Startup banner, printed before the listener is bound
pub fn log_server_start(config: &ServerConfig) {
    for line in banner_lines(config.port) {
        write_info(&line);
    }
}

pub fn wasm_served_line(path: &str) -> String {
    format!("Serving {path} as application/wasm")
}

pub fn log_info(message: &str) {
    write_info(message);
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_error(&entry.format());
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("\n[SIGNAL] Ctrl+C received, shutting down");
}
