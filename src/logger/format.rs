//! Access log format module
//!
//! One line per request:
//! `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`

use chrono::Local;

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI as sent, query included
    pub uri: String,
    /// HTTP version as printed in the request line
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes, `None` when nothing was sent
    pub body_bytes: Option<usize>,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, uri: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            uri,
            http_version: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: None,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y %H:%M:%S"),
            self.method,
            self.uri,
            self.http_version,
            self.status,
            self.body_bytes
                .filter(|n| *n > 0)
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        )
    }
}
