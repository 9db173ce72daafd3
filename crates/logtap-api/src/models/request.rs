use serde::Deserialize;

/// Query string shared by `/logs` and `/logs/parsed`.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub term: String,
    pub regex: Option<String>,
    // signed so out-of-range values reach validation instead of the extractor
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    // report a bad pattern as 400 instead of matching nothing
    #[serde(default)]
    pub strict_regex: bool,
}

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_filename() -> String {
    "syslog".to_string()
}

fn default_limit() -> i64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "auto".to_string()
}
