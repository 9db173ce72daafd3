// Syslog log parser (BSD / RFC 3164 style)

use super::LogParser;
use crate::{LogLevel, Metadata, ParsedLogEntry};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

// [<PRI>]Mon DD HH:MM:SS
static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:<(?P<pri>\d{1,3})>)?(?P<ts>(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})(?:\s+|$)",
    )
    .expect("syslog prefix pattern")
});

// [<PRI>]Mon DD HH:MM:SS hostname process[pid]: message
static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:<(?P<pri>\d{1,3})>)?(?P<ts>(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(?P<host>\S+)\s+(?P<process>[^\s\[:]+)(?:\[(?P<pid>[^\]]+)\])?:\s*(?P<message>.*)$",
    )
    .expect("syslog line pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyslogParser;

impl SyslogParser {
    pub fn new() -> Self {
        Self
    }

    /// Severity from the message body: "error" wins over "warn"/"warning".
    pub fn keyword_level(message: &str) -> LogLevel {
        let lower = message.to_lowercase();
        if lower.contains("error") {
            LogLevel::Error
        } else if lower.contains("warning") || lower.contains("warn") {
            LogLevel::Warning
        } else {
            LogLevel::Info
        }
    }

    // Syslog severity is priority % 8
    fn priority_level(priority: u16) -> LogLevel {
        LogLevel::from_severity((priority % 8) as u8).unwrap_or(LogLevel::Info)
    }

    fn insert_priority(fields: &mut Metadata, priority: Option<u16>) {
        if let Some(pri) = priority {
            fields.insert("priority".to_string(), json!(pri));
            fields.insert("facility".to_string(), json!(pri / 8));
        }
    }
}

impl LogParser for SyslogParser {
    fn name(&self) -> &'static str {
        "syslog"
    }

    fn can_parse(&self, line: &str) -> bool {
        PREFIX.is_match(line)
    }

    fn parse(&self, line: &str) -> ParsedLogEntry {
        if let Some(caps) = LINE.captures(line) {
            let priority: Option<u16> = caps.name("pri").and_then(|m| m.as_str().parse().ok());
            let timestamp = caps.name("ts").map(|m| m.as_str().to_string());
            let hostname = caps.name("host").map(|m| m.as_str()).unwrap_or("");
            let process = caps.name("process").map(|m| m.as_str()).unwrap_or("");
            let pid = caps.name("pid").map(|m| m.as_str());
            let message = caps.name("message").map(|m| m.as_str()).unwrap_or("");

            let mut fields = Metadata::new();
            fields.insert("hostname".to_string(), json!(hostname));
            fields.insert("process".to_string(), json!(process));
            if let Some(p) = pid {
                fields.insert("pid".to_string(), json!(p));
            }
            Self::insert_priority(&mut fields, priority);

            let level = priority
                .map(Self::priority_level)
                .unwrap_or_else(|| Self::keyword_level(message));

            return ParsedLogEntry::new(
                line,
                message,
                level,
                Some(format!("{hostname}/{process}")),
                timestamp,
                fields,
            );
        }

        // Timestamp prefix but no "process:" part - keep what we can
        if let Some(caps) = PREFIX.captures(line) {
            let priority: Option<u16> = caps.name("pri").and_then(|m| m.as_str().parse().ok());
            let timestamp = caps.name("ts").map(|m| m.as_str().to_string());
            let rest = line[caps.get(0).map_or(0, |m| m.end())..].trim();

            let mut fields = Metadata::new();
            Self::insert_priority(&mut fields, priority);

            let level = priority
                .map(Self::priority_level)
                .unwrap_or_else(|| Self::keyword_level(rest));

            return ParsedLogEntry::new(line, rest, level, None, timestamp, fields);
        }

        ParsedLogEntry::minimal(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_level() {
        assert_eq!(SyslogParser::keyword_level("Error: connection failed"), LogLevel::Error);
        assert_eq!(SyslogParser::keyword_level("3 errors found"), LogLevel::Error);
        assert_eq!(SyslogParser::keyword_level("Warning: disk space low"), LogLevel::Warning);
        assert_eq!(SyslogParser::keyword_level("WARN slow query"), LogLevel::Warning);
        assert_eq!(SyslogParser::keyword_level("error after warning"), LogLevel::Error);
        assert_eq!(SyslogParser::keyword_level("Connection closed"), LogLevel::Info);
    }

    #[test]
    fn test_priority_overrides_keywords() {
        // 11 = facility 1, severity 3
        let entry = SyslogParser.parse("<11>Feb  8 10:00:00 host app: all good");
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.metadata["priority"], json!(11));
        assert_eq!(entry.metadata["facility"], json!(1));
    }

    #[test]
    fn test_prefix_only_line() {
        let entry = SyslogParser.parse("Mar  3 01:02:03 lonely warning without process");
        assert_eq!(entry.timestamp.as_deref(), Some("Mar  3 01:02:03"));
        assert_eq!(entry.message, "lonely warning without process");
        assert_eq!(entry.level, LogLevel::Warning);
        assert!(entry.source.is_none());
    }

    #[test]
    fn test_unknown_month_rejected() {
        assert!(!SyslogParser.can_parse("Foo  8 10:23:45 server sshd[1]: x"));
        assert_eq!(SyslogParser.parse("not syslog"), ParsedLogEntry::minimal("not syslog"));
    }
}
