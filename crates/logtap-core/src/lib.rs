//! Core engine for logtap
//! tail reading, line filtering and structured parsing of on-disk log files.
pub mod error;
pub mod parser;
pub mod reader;
pub mod search;
pub mod validation;

pub use error::TailError;
pub use parser::detect::{detect_format, detect_parser, resolve_parser, DETECTION_SAMPLE_SIZE};
pub use parser::{AutoParser, Detected, LogFormat, LogParser, Parser};
pub use reader::{get_file_lines, get_file_lines_async, tail, tail_async, TailReader};
pub use search::{filter_lines, validate_regex, LineFilter};
pub use validation::{has_path_separator, is_filename_valid, is_limit_valid, is_search_term_valid};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Format-specific fields attached to a parsed entry, in insertion order.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// LOG LEVEL //

/// Log severity levels, ordered from most to least urgent (syslog codes 0..=7)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Emergency,
        LogLevel::Alert,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Notice,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Syslog numeric severity (0 = emergency ... 7 = debug)
    pub fn severity(self) -> u8 {
        match self {
            LogLevel::Emergency => 0,
            LogLevel::Alert => 1,
            LogLevel::Critical => 2,
            LogLevel::Error => 3,
            LogLevel::Warning => 4,
            LogLevel::Notice => 5,
            LogLevel::Info => 6,
            LogLevel::Debug => 7,
        }
    }

    pub fn from_severity(severity: u8) -> Option<Self> {
        Self::ALL.get(severity as usize).copied()
    }

    /// Parse a level from a numeric code, a name or a common alias (case-insensitive).
    /// Anything unrecognized is `Info`: an unreadable level never rejects a line.
    pub fn from_str_lossy(s: &str) -> Self {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_severity(code).unwrap_or(LogLevel::Info);
        }

        match s.to_lowercase().as_str() {
            "emergency" | "emerg" | "panic" => LogLevel::Emergency,
            "alert" => LogLevel::Alert,
            "critical" | "crit" | "fatal" => LogLevel::Critical,
            "error" | "err" => LogLevel::Error,
            "warning" | "warn" => LogLevel::Warning,
            "notice" => LogLevel::Notice,
            "info" | "information" | "informational" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            // apache uses trace1..trace8
            other if other.starts_with("trace") => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Emergency => "emergency",
            LogLevel::Alert => "alert",
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Notice => "notice",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Level implied by an HTTP status code in access logs.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            500.. => LogLevel::Error,
            400..=499 => LogLevel::Warning,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// PARSED LOG ENTRY //

/// One log line normalized into a structured record.
///
/// `raw` always holds the exact input line. The promoted fields
/// (`message`, `level`, `source`, `timestamp`) never appear in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLogEntry {
    pub message: String,
    pub level: LogLevel,

    #[serde(default)]
    pub source: Option<String>,

    /// Timestamp text as captured from the line, not normalized.
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    pub raw: String,
}

/// Keys that are promoted to named fields and must never stay in metadata.
pub const RESERVED_KEYS: [&str; 4] = ["message", "level", "source", "timestamp"];

impl ParsedLogEntry {
    /// Fallback entry for a line no parser understood.
    pub fn minimal(line: &str) -> Self {
        Self {
            message: line.to_string(),
            level: LogLevel::Info,
            source: None,
            timestamp: None,
            metadata: Metadata::new(),
            raw: line.to_string(),
        }
    }

    pub(crate) fn new(
        line: &str,
        message: impl Into<String>,
        level: LogLevel,
        source: Option<String>,
        timestamp: Option<String>,
        mut metadata: Metadata,
    ) -> Self {
        for key in RESERVED_KEYS {
            metadata.shift_remove(key);
        }
        Self {
            message: message.into(),
            level,
            source,
            timestamp,
            metadata,
            raw: line.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_lossy_names() {
        assert_eq!(LogLevel::from_str_lossy("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_lossy("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_lossy("warn"), LogLevel::Warning);
        assert_eq!(LogLevel::from_str_lossy("Warning"), LogLevel::Warning);
        assert_eq!(LogLevel::from_str_lossy("info"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_lossy("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_lossy("crit"), LogLevel::Critical);
    }

    #[test]
    fn test_from_str_lossy_numeric() {
        for (code, level) in LogLevel::ALL.iter().enumerate() {
            assert_eq!(LogLevel::from_str_lossy(&code.to_string()), *level);
        }
        assert_eq!(LogLevel::from_str_lossy("0"), LogLevel::Emergency);
        assert_eq!(LogLevel::from_str_lossy("3"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_lossy("7"), LogLevel::Debug);
    }

    #[test]
    fn test_unrecognized_defaults_to_info() {
        assert_eq!(LogLevel::from_str_lossy("8"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_lossy("verbose-ish"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_lossy(""), LogLevel::Info);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(LogLevel::Emergency.severity() < LogLevel::Alert.severity());
        assert!(LogLevel::Error.severity() < LogLevel::Warning.severity());
        assert!(LogLevel::Warning.severity() < LogLevel::Info.severity());
        assert!(LogLevel::Info.severity() < LogLevel::Debug.severity());
        assert!(LogLevel::Emergency < LogLevel::Debug);
    }

    #[test]
    fn test_http_status_levels() {
        assert_eq!(LogLevel::from_http_status(200), LogLevel::Info);
        assert_eq!(LogLevel::from_http_status(302), LogLevel::Info);
        assert_eq!(LogLevel::from_http_status(404), LogLevel::Warning);
        assert_eq!(LogLevel::from_http_status(503), LogLevel::Error);
    }

    #[test]
    fn test_new_strips_reserved_keys() {
        let mut metadata = Metadata::new();
        metadata.insert("level".to_string(), serde_json::json!("error"));
        metadata.insert("pid".to_string(), serde_json::json!("42"));
        let entry = ParsedLogEntry::new("x", "x", LogLevel::Info, None, None, metadata);
        assert!(!entry.metadata.contains_key("level"));
        assert_eq!(entry.metadata.get("pid"), Some(&serde_json::json!("42")));
    }

    #[test]
    fn test_serializes_level_lowercase() {
        let entry = ParsedLogEntry::minimal("hello");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["raw"], "hello");
    }
}
