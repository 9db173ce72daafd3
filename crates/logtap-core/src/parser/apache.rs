// Apache log parser

use super::nginx::AccessFields;
use super::LogParser;
use crate::{LogLevel, Metadata, ParsedLogEntry};
use regex::{Captures, Regex};
use serde_json::json;
use std::sync::LazyLock;

// [vhost:port ]host ident authuser [date] "request" status bytes ["referer" "agent"]
static ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:(?P<vhost>[^\s:]+:\d+)\s+)?(?P<addr>\S+)\s+(?P<ident>\S+)\s+(?P<user>\S+)\s+\[(?P<time>[^\]]+)\]\s+"(?P<request>(?:[^"\\]|\\.)*)"\s+(?P<status>\d{3})\s+(?P<bytes>\d+|-)(?:\s+"(?P<referer>(?:[^"\\]|\\.)*)"\s+"(?P<agent>(?:[^"\\]|\\.)*)")?"#,
    )
    .expect("apache access pattern")
});

// [Sun Dec 04 04:47:44 2005] [error] msg
// [Tue Feb 10 14:30:45.123 2026] [core:error] [pid 42:tid 7] [client 1.2.3.4:5] msg
static ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[(?P<time>[^\]]+)\]\s+\[(?:(?P<module>[^:\]\s]+):)?(?P<level>[A-Za-z]+\d?)\](?:\s+\[pid (?P<pid>\d+)(?::tid (?P<tid>\d+))?\])?(?:\s+\[client (?P<client>[^\]]+)\])?\s*(?P<message>.*)$",
    )
    .expect("apache error pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApacheParser;

impl ApacheParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_access(line: &str, caps: &Captures<'_>) -> Option<ParsedLogEntry> {
        let access = AccessFields::from_captures(caps)?;

        let mut fields = Metadata::new();
        if let Some(vhost) = caps.name("vhost") {
            fields.insert("vhost".to_string(), json!(vhost.as_str()));
        }
        fields.insert("remote_host".to_string(), json!(access.addr));
        if let Some(user) = access.user {
            fields.insert("remote_user".to_string(), json!(user));
        }
        if let Some(method) = access.method {
            fields.insert("method".to_string(), json!(method));
        }
        if let Some(path) = access.path {
            fields.insert("path".to_string(), json!(path));
        }
        if let Some(protocol) = access.protocol {
            fields.insert("protocol".to_string(), json!(protocol));
        }
        fields.insert("status".to_string(), json!(access.status));
        if let Some(bytes) = access.bytes {
            fields.insert("bytes".to_string(), json!(bytes));
        }
        if let Some(referer) = access.referer {
            fields.insert("referer".to_string(), json!(referer));
        }
        if let Some(agent) = access.agent {
            fields.insert("user_agent".to_string(), json!(agent));
        }

        Some(ParsedLogEntry::new(
            line,
            access.summary(),
            LogLevel::from_http_status(access.status),
            Some(access.addr.to_string()),
            Some(access.time.to_string()),
            fields,
        ))
    }

    fn parse_error(line: &str, caps: &Captures<'_>) -> ParsedLogEntry {
        let timestamp = caps.name("time").map(|m| m.as_str().to_string());
        let level = caps.name("level").map(|m| m.as_str()).unwrap_or("info");
        let module = caps.name("module").map(|m| m.as_str());
        let message = caps.name("message").map(|m| m.as_str()).unwrap_or(line);

        let mut fields = Metadata::new();
        if let Some(module) = module {
            fields.insert("module".to_string(), json!(module));
        }
        if let Some(pid) = caps.name("pid") {
            fields.insert("pid".to_string(), json!(pid.as_str()));
        }
        if let Some(tid) = caps.name("tid") {
            fields.insert("tid".to_string(), json!(tid.as_str()));
        }
        if let Some(client) = caps.name("client") {
            fields.insert("client".to_string(), json!(client.as_str()));
        }

        ParsedLogEntry::new(
            line,
            message,
            LogLevel::from_str_lossy(level),
            module.map(str::to_string),
            timestamp,
            fields,
        )
    }
}

impl LogParser for ApacheParser {
    fn name(&self) -> &'static str {
        "apache"
    }

    fn can_parse(&self, line: &str) -> bool {
        ACCESS.is_match(line) || ERROR.is_match(line)
    }

    fn parse(&self, line: &str) -> ParsedLogEntry {
        if let Some(entry) = ACCESS
            .captures(line)
            .and_then(|caps| Self::parse_access(line, &caps))
        {
            return entry;
        }

        if let Some(caps) = ERROR.captures(line) {
            return Self::parse_error(line, &caps);
        }

        // fallback treat as plain message
        ParsedLogEntry::minimal(line)
    }
}
