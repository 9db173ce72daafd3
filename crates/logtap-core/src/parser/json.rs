// JSON lines parser

use super::LogParser;
use crate::{LogLevel, Metadata, ParsedLogEntry};
use serde_json::Value;

// Candidate keys, first present wins
const MESSAGE_KEYS: [&str; 4] = ["message", "msg", "text", "log"];
const LEVEL_KEYS: [&str; 4] = ["level", "severity", "lvl", "loglevel"];
const TIMESTAMP_KEYS: [&str; 4] = ["timestamp", "time", "ts", "@timestamp"];
const SOURCE_KEYS: [&str; 3] = ["source", "logger", "service"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_object(line: &str) -> Option<Metadata> {
        // quick reject before running the JSON parser
        if !line.trim_start().starts_with('{') {
            return None;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Remove and return the value of the first candidate key present.
    fn take_first(fields: &mut Metadata, keys: &[&str]) -> Option<Value> {
        keys.iter().find_map(|key| fields.shift_remove(*key))
    }

    fn text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    fn level(value: &Value) -> LogLevel {
        match value {
            Value::String(s) => LogLevel::from_str_lossy(s),
            Value::Number(n) => n
                .as_u64()
                .and_then(|code| u8::try_from(code).ok())
                .and_then(LogLevel::from_severity)
                .unwrap_or(LogLevel::Info),
            _ => LogLevel::Info,
        }
    }
}

impl LogParser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn can_parse(&self, line: &str) -> bool {
        Self::parse_object(line).is_some()
    }

    fn parse(&self, line: &str) -> ParsedLogEntry {
        let Some(mut fields) = Self::parse_object(line) else {
            return ParsedLogEntry::minimal(line);
        };

        let message = Self::take_first(&mut fields, &MESSAGE_KEYS)
            .map(Self::text)
            .unwrap_or_else(|| line.to_string());
        let level = Self::take_first(&mut fields, &LEVEL_KEYS)
            .map(|v| Self::level(&v))
            .unwrap_or(LogLevel::Info);
        let timestamp = Self::take_first(&mut fields, &TIMESTAMP_KEYS).map(Self::text);
        let source = Self::take_first(&mut fields, &SOURCE_KEYS).map(Self::text);

        ParsedLogEntry::new(line, message, level, source, timestamp, fields)
    }
}
