//! Access log format module
//!
//! One entry per served request, rendered as Apache/Nginx `combined`,
//! Common Log Format, or a JSON object.

use chrono::{DateTime, Local};
use serde_json::json;

use crate::config::AccessLogFormat;

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Request path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"-\" \"{}\"",
                self.format_common(),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}{} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1:50000".to_string(),
            "POST".to_string(),
            "/api/tools/ohms-law".to_string(),
        );
        entry.query = Some("debug=1".to_string());
        entry.status = 400;
        entry.body_bytes = 33;
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.request_time_us = 120;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(AccessLogFormat::Combined);
        assert!(log.starts_with("192.168.1.1:50000 - - ["));
        assert!(log.contains("\"POST /api/tools/ohms-law?debug=1 HTTP/1.1\""));
        assert!(log.contains(" 400 33 "));
        assert!(log.ends_with("\"-\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format(AccessLogFormat::Common);
        assert!(log.contains("\"POST /api/tools/ohms-law?debug=1 HTTP/1.1\" 400 33"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format(AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["status"], 400);
        assert_eq!(value["body_bytes"], 33);
        assert_eq!(value["user_agent"], "curl/8.5.0");
        assert_eq!(value["request_time_us"], 120);
    }

    #[test]
    fn test_missing_optional_fields() {
        let entry = AccessLogEntry::new("[::1]:1".to_string(), "GET".to_string(), "/".to_string());
        assert!(entry
            .format(AccessLogFormat::Combined)
            .ends_with("\"-\" \"-\""));
        let value: serde_json::Value =
            serde_json::from_str(&entry.format(AccessLogFormat::Json)).unwrap();
        assert!(value["query"].is_null());
    }
}
