// Auto-detecting parser: tries each format per line

use super::{LogFormat, LogParser};
use crate::ParsedLogEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoParser;

/// A parsed entry plus the format that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detected {
    /// `None` when no format matched and the entry is the minimal fallback.
    pub format: Option<LogFormat>,
    pub entry: ParsedLogEntry,
}

impl Detected {
    /// `"auto:<format>"`, or `"auto"` for the fallback.
    pub fn parser_name(&self) -> String {
        match self.format {
            Some(format) => format!("auto:{format}"),
            None => "auto".to_string(),
        }
    }
}

impl AutoParser {
    pub fn new() -> Self {
        Self
    }

    /// First format (in dispatch order) whose pre-check accepts the line.
    pub fn format_of(&self, line: &str) -> Option<LogFormat> {
        LogFormat::ALL
            .into_iter()
            .find(|format| format.can_parse(line))
    }

    pub fn detect(&self, line: &str) -> Detected {
        match self.format_of(line) {
            Some(format) => Detected {
                format: Some(format),
                entry: format.parse(line),
            },
            None => Detected {
                format: None,
                entry: ParsedLogEntry::minimal(line),
            },
        }
    }

    /// Per-line dispatch; the format may change from one line to the next.
    pub fn detect_many(&self, lines: &[String]) -> Vec<Detected> {
        lines.iter().map(|line| self.detect(line)).collect()
    }
}

impl LogParser for AutoParser {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn can_parse(&self, line: &str) -> bool {
        self.format_of(line).is_some()
    }

    fn parse(&self, line: &str) -> ParsedLogEntry {
        self.detect(line).entry
    }
}
