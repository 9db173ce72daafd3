use logtap_core::ParsedLogEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub lines: Vec<String>,
    pub count: usize,
    pub filename: String,
}

/// A parsed entry plus the parser that produced it, e.g. `auto:json`.
#[derive(Debug, Serialize)]
pub struct ParsedEntry {
    pub parser: String,
    #[serde(flatten)]
    pub entry: ParsedLogEntry,
}

#[derive(Debug, Serialize)]
pub struct ParsedLogResponse {
    pub entries: Vec<ParsedEntry>,
    pub count: usize,
    pub filename: String,
    /// Concrete format name, or "auto" for per-line detection.
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
    pub directory: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
