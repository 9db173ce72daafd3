//! Substring and regex filtering of log lines.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// A compiled line predicate.
#[derive(Debug, Clone)]
pub enum LineFilter {
    /// No term and no pattern: every line passes.
    All,
    /// Case-insensitive terms are stored lowercased.
    Substring { term: String, case_sensitive: bool },
    Pattern(Regex),
    /// The pattern did not compile: nothing passes.
    Nothing,
}

impl LineFilter {
    /// `regex` wins over `term`; empty strings count as absent.
    pub fn new(term: Option<&str>, regex: Option<&str>, case_sensitive: bool) -> Self {
        let term = term.filter(|t| !t.is_empty());
        let regex = regex.filter(|r| !r.is_empty());

        if let Some(pattern) = regex {
            return match RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(re) => LineFilter::Pattern(re),
                Err(err) => {
                    debug!(pattern, error = %err, "invalid search pattern, matching nothing");
                    LineFilter::Nothing
                }
            };
        }

        match term {
            Some(term) if case_sensitive => LineFilter::Substring {
                term: term.to_string(),
                case_sensitive,
            },
            Some(term) => LineFilter::Substring {
                term: term.to_lowercase(),
                case_sensitive,
            },
            None => LineFilter::All,
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            LineFilter::All => true,
            LineFilter::Substring {
                term,
                case_sensitive: true,
            } => line.contains(term.as_str()),
            LineFilter::Substring { term, .. } => line.to_lowercase().contains(term.as_str()),
            LineFilter::Pattern(re) => re.is_match(line),
            LineFilter::Nothing => false,
        }
    }

    /// Keep matching lines, preserving order.
    pub fn apply(&self, mut lines: Vec<String>) -> Vec<String> {
        match self {
            LineFilter::All => lines,
            LineFilter::Nothing => Vec::new(),
            _ => {
                lines.retain(|line| self.matches(line));
                lines
            }
        }
    }
}

/// Filter `lines` by `regex` (takes precedence) or `term`.
///
/// Without either the input comes back unchanged. An invalid pattern
/// yields no lines rather than an error; use [`validate_regex`] first if
/// the caller wants to report it.
pub fn filter_lines(
    lines: Vec<String>,
    term: Option<&str>,
    regex: Option<&str>,
    case_sensitive: bool,
) -> Vec<String> {
    LineFilter::new(term, regex, case_sensitive).apply(lines)
}

pub fn validate_regex(pattern: &str) -> Result<(), regex::Error> {
    Regex::new(pattern).map(|_| ())
}
