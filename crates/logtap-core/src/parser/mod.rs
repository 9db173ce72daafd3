//! log parsers - turn raw log lines into structured entries

pub mod apache;
pub mod auto;
pub mod detect;
pub mod json;
pub mod nginx;
pub mod syslog;

pub use apache::ApacheParser;
pub use auto::{AutoParser, Detected};
pub use json::JsonParser;
pub use nginx::NginxParser;
pub use syslog::SyslogParser;

use crate::ParsedLogEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log format: {0}")]
pub struct UnknownFormat(pub String);

// Parser trait - every parser implements this

pub trait LogParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap syntactic pre-check. `true` does not promise a full parse.
    fn can_parse(&self, line: &str) -> bool;

    /// Never fails: a line that does not fit degrades to a minimal entry.
    fn parse(&self, line: &str) -> ParsedLogEntry;

    fn parse_many(&self, lines: &[String]) -> Vec<ParsedLogEntry> {
        lines.iter().map(|line| self.parse(line)).collect()
    }
}

/// The concrete line syntaxes, in auto-dispatch order (most distinctive first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Syslog,
    Nginx,
    Apache,
}

impl LogFormat {
    pub const ALL: [LogFormat; 4] = [
        LogFormat::Json,
        LogFormat::Syslog,
        LogFormat::Nginx,
        LogFormat::Apache,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Syslog => "syslog",
            LogFormat::Nginx => "nginx",
            LogFormat::Apache => "apache",
        }
    }

    pub fn parser(self) -> Parser {
        match self {
            LogFormat::Json => Parser::Json(JsonParser),
            LogFormat::Syslog => Parser::Syslog(SyslogParser),
            LogFormat::Nginx => Parser::Nginx(NginxParser),
            LogFormat::Apache => Parser::Apache(ApacheParser),
        }
    }

    pub fn can_parse(self, line: &str) -> bool {
        self.parser().can_parse(line)
    }

    pub fn parse(self, line: &str) -> ParsedLogEntry {
        self.parser().parse(line)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Closed set of parsers; dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    Syslog(SyslogParser),
    Json(JsonParser),
    Nginx(NginxParser),
    Apache(ApacheParser),
    Auto(AutoParser),
}

impl Parser {
    /// `"auto"` or one of the format names.
    pub fn from_name(name: &str) -> Result<Self, UnknownFormat> {
        if name.trim().eq_ignore_ascii_case("auto") {
            return Ok(Parser::Auto(AutoParser));
        }
        name.parse::<LogFormat>().map(LogFormat::parser)
    }

    /// The concrete format, `None` for the auto parser.
    pub fn format(&self) -> Option<LogFormat> {
        match self {
            Parser::Syslog(_) => Some(LogFormat::Syslog),
            Parser::Json(_) => Some(LogFormat::Json),
            Parser::Nginx(_) => Some(LogFormat::Nginx),
            Parser::Apache(_) => Some(LogFormat::Apache),
            Parser::Auto(_) => None,
        }
    }

    /// Each entry paired with the name of the parser that produced it.
    /// The auto parser reports `auto:<format>` per line (`auto` for the
    /// fallback); a concrete parser reports its own name.
    pub fn parse_labeled(&self, lines: &[String]) -> Vec<(String, ParsedLogEntry)> {
        match self {
            Parser::Auto(auto) => auto
                .detect_many(lines)
                .into_iter()
                .map(|detected| (detected.parser_name(), detected.entry))
                .collect(),
            concrete => lines
                .iter()
                .map(|line| (concrete.name().to_string(), concrete.parse(line)))
                .collect(),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::Auto(AutoParser)
    }
}

impl From<LogFormat> for Parser {
    fn from(format: LogFormat) -> Self {
        format.parser()
    }
}

impl LogParser for Parser {
    fn name(&self) -> &'static str {
        match self {
            Parser::Syslog(p) => p.name(),
            Parser::Json(p) => p.name(),
            Parser::Nginx(p) => p.name(),
            Parser::Apache(p) => p.name(),
            Parser::Auto(p) => p.name(),
        }
    }

    fn can_parse(&self, line: &str) -> bool {
        match self {
            Parser::Syslog(p) => p.can_parse(line),
            Parser::Json(p) => p.can_parse(line),
            Parser::Nginx(p) => p.can_parse(line),
            Parser::Apache(p) => p.can_parse(line),
            Parser::Auto(p) => p.can_parse(line),
        }
    }

    fn parse(&self, line: &str) -> ParsedLogEntry {
        match self {
            Parser::Syslog(p) => p.parse(line),
            Parser::Json(p) => p.parse(line),
            Parser::Nginx(p) => p.parse(line),
            Parser::Apache(p) => p.parse(line),
            Parser::Auto(p) => p.parse(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Nginx".parse::<LogFormat>(), Ok(LogFormat::Nginx));
        assert_eq!(
            "logfmt".parse::<LogFormat>(),
            Err(UnknownFormat("logfmt".to_string()))
        );
    }

    #[test]
    fn test_parser_from_name() {
        assert_eq!(Parser::from_name("auto").unwrap().name(), "auto");
        assert_eq!(Parser::from_name("syslog").unwrap().name(), "syslog");
        assert_eq!(Parser::from_name("apache").unwrap().format(), Some(LogFormat::Apache));
        assert!(Parser::from_name("csv").is_err());
    }

    #[test]
    fn test_parser_names_match_formats() {
        for format in LogFormat::ALL {
            assert_eq!(format.parser().name(), format.name());
            assert_eq!(format.parser().format(), Some(format));
        }
    }

    #[test]
    fn test_parse_labeled_reports_auto_provenance() {
        let lines = vec![
            r#"{"message": "json line"}"#.to_string(),
            "Jan  8 10:23:45 server cron[9]: syslog line".to_string(),
            "plain".to_string(),
        ];
        let names: Vec<String> = Parser::default()
            .parse_labeled(&lines)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["auto:json", "auto:syslog", "auto"]);
    }

    #[test]
    fn test_parse_labeled_concrete_parser() {
        let lines = vec!["Jan  8 10:23:45 server cron[9]: x".to_string()];
        let labeled = Parser::Syslog(SyslogParser).parse_labeled(&lines);
        assert_eq!(labeled[0].0, "syslog");
        assert_eq!(labeled[0].1, SyslogParser.parse(&lines[0]));
    }
}
