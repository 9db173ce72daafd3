// Nginx log parser

use super::LogParser;
use crate::{LogLevel, Metadata, ParsedLogEntry};
use regex::{Captures, Regex};
use serde_json::json;
use std::sync::LazyLock;

// addr ident user [time] "request" ...
static ACCESS_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\S+\s+\S+\s+\S+\s+\[[^\]]+\]\s+""#).expect("nginx access prefix pattern")
});

// Combined format: addr - user [time] "METHOD PATH PROTO" status bytes "referer" "user agent"
static ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<addr>\S+)\s+(?P<ident>\S+)\s+(?P<user>\S+)\s+\[(?P<time>[^\]]+)\]\s+"(?P<request>(?:[^"\\]|\\.)*)"\s+(?P<status>\d{3})\s+(?P<bytes>\d+|-)(?:\s+"(?P<referer>(?:[^"\\]|\\.)*)"\s+"(?P<agent>(?:[^"\\]|\\.)*)")?"#,
    )
    .expect("nginx access pattern")
});

// Error log: 2024/02/08 10:30:00 [error] 12345#0: ...
static ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<time>\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}) \[(?P<level>\w+)\] (?P<pid>\d+)#(?P<tid>\d+): (?P<message>.*)$",
    )
    .expect("nginx error pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NginxParser;

/// Fields shared by the nginx and apache access log layouts.
pub(crate) struct AccessFields<'a> {
    pub addr: &'a str,
    pub user: Option<&'a str>,
    pub time: &'a str,
    pub method: Option<&'a str>,
    pub path: Option<&'a str>,
    pub protocol: Option<&'a str>,
    pub request: &'a str,
    pub status: u16,
    pub bytes: Option<u64>,
    pub referer: Option<&'a str>,
    pub agent: Option<&'a str>,
}

impl<'a> AccessFields<'a> {
    pub(crate) fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let request = caps.name("request")?.as_str();
        let mut parts = request.split_whitespace();
        let (method, path, protocol) = match (parts.next(), parts.next()) {
            (Some(method), Some(path)) => (Some(method), Some(path), parts.next()),
            _ => (None, None, None),
        };

        Some(Self {
            addr: caps.name("addr")?.as_str(),
            user: non_dash(caps.name("user").map(|m| m.as_str())),
            time: caps.name("time")?.as_str(),
            method,
            path,
            protocol,
            request,
            status: caps.name("status")?.as_str().parse().ok()?,
            bytes: caps.name("bytes").and_then(|m| m.as_str().parse().ok()),
            referer: non_dash(caps.name("referer").map(|m| m.as_str())),
            agent: non_dash(caps.name("agent").map(|m| m.as_str())),
        })
    }

    /// "GET /path 200", or the raw request text when it has no method/path.
    pub(crate) fn summary(&self) -> String {
        match (self.method, self.path) {
            (Some(method), Some(path)) => format!("{} {} {}", method, path, self.status),
            _ => format!("{} {}", self.request, self.status),
        }
    }
}

fn non_dash(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "-")
}

impl NginxParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_access(line: &str, caps: &Captures<'_>) -> Option<ParsedLogEntry> {
        let access = AccessFields::from_captures(caps)?;

        let mut fields = Metadata::new();
        fields.insert("remote_addr".to_string(), json!(access.addr));
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
            fields.insert("body_bytes_sent".to_string(), json!(bytes));
        }
        if let Some(referer) = access.referer {
            fields.insert("http_referer".to_string(), json!(referer));
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
        let pid = caps.name("pid").map(|m| m.as_str()).unwrap_or("");
        let tid = caps.name("tid").map(|m| m.as_str()).unwrap_or("");
        let message = caps.name("message").map(|m| m.as_str()).unwrap_or(line);

        let mut fields = Metadata::new();
        fields.insert("pid".to_string(), json!(pid));
        fields.insert("tid".to_string(), json!(tid));

        ParsedLogEntry::new(
            line,
            message,
            LogLevel::from_str_lossy(level),
            Some("nginx".to_string()),
            timestamp,
            fields,
        )
    }
}

impl LogParser for NginxParser {
    fn name(&self) -> &'static str {
        "nginx"
    }

    fn can_parse(&self, line: &str) -> bool {
        ACCESS_PREFIX.is_match(line) || ERROR.is_match(line)
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

        ParsedLogEntry::minimal(line)
    }
}
