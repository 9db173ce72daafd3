//! Format detection by majority vote over a sample of lines.

use super::{LogFormat, Parser};

/// Lines callers typically hand to [`detect_format`].
pub const DETECTION_SAMPLE_SIZE: usize = 10;

/// Per-format `can_parse` hits over a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatVotes {
    /// Non-blank lines looked at.
    pub sampled: usize,
    /// Hits per format, in dispatch order.
    pub hits: [(LogFormat, usize); 4],
}

impl FormatVotes {
    pub fn tally<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut hits = LogFormat::ALL.map(|format| (format, 0));
        let mut sampled = 0;

        for line in lines.iter().map(AsRef::as_ref) {
            if line.trim().is_empty() {
                continue;
            }
            sampled += 1;
            for (format, count) in hits.iter_mut() {
                if format.can_parse(line) {
                    *count += 1;
                }
            }
        }

        Self { sampled, hits }
    }

    /// Highest tally; ties go to the earlier format in dispatch order.
    pub fn leader(&self) -> Option<(LogFormat, usize)> {
        let mut best: Option<(LogFormat, usize)> = None;
        for &(format, count) in &self.hits {
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((format, count));
            }
        }
        best
    }

    /// The leader, if it matched a strict majority of the sample.
    pub fn winner(&self) -> Option<LogFormat> {
        self.leader()
            .filter(|&(_, count)| count * 2 > self.sampled)
            .map(|(format, _)| format)
    }
}

/// Best matching format for a sample, or `None` without a confident choice.
pub fn detect_format<S: AsRef<str>>(lines: &[S]) -> Option<LogFormat> {
    let votes = FormatVotes::tally(lines);
    tracing::debug!(sampled = votes.sampled, hits = ?votes.hits, "format votes");
    votes.winner()
}

pub fn detect_parser<S: AsRef<str>>(lines: &[S]) -> Option<Parser> {
    detect_format(lines).map(LogFormat::parser)
}

/// Pin an auto parser to the format detected from the first
/// [`DETECTION_SAMPLE_SIZE`] lines. Concrete parsers, and auto without a
/// confident detection, come back unchanged.
pub fn resolve_parser<S: AsRef<str>>(parser: Parser, lines: &[S]) -> Parser {
    match parser {
        Parser::Auto(_) => {
            let sample = &lines[..lines.len().min(DETECTION_SAMPLE_SIZE)];
            detect_parser(sample).unwrap_or(parser)
        }
        concrete => concrete,
    }
}
