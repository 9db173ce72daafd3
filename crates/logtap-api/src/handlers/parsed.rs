use axum::{
    Json,
    extract::{Query, State},
};
use logtap_core::parser::{LogParser, Parser};
use logtap_core::resolve_parser;
use std::sync::Arc;
use tracing::{debug, info};

use super::logs::read_lines;
use crate::error::ApiError;
use crate::models::{FormatQuery, LogQuery, ParsedEntry, ParsedLogResponse};
use crate::state::AppState;

pub const ERROR_INVALID_FORMAT: &str =
    "Invalid format: must be one of auto, syslog, json, nginx, apache";

pub async fn get_parsed_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogQuery>,
    Query(format): Query<FormatQuery>,
) -> Result<Json<ParsedLogResponse>, ApiError> {
    let parser =
        Parser::from_name(&format.format).map_err(|_| ApiError::bad_request(ERROR_INVALID_FORMAT))?;

    let lines = read_lines(&state, &params).await?;
    let (entries, format) = parse_lines(parser, &lines);

    info!(filename = %params.filename, format = %format, count = entries.len(), "Parsed logs request");

    Ok(Json(ParsedLogResponse {
        count: entries.len(),
        entries,
        filename: params.filename,
        format,
    }))
}

/// Parse with `requested`; for auto, commit to one format when the first
/// lines agree on it, else dispatch per line and label each entry with the
/// format that matched it.
fn parse_lines(requested: Parser, lines: &[String]) -> (Vec<ParsedEntry>, String) {
    let parser = resolve_parser(requested, lines);
    if requested != parser {
        debug!(format = parser.name(), "Format detected from sample");
    }
    let entries = parser
        .parse_labeled(lines)
        .into_iter()
        .map(|(name, entry)| ParsedEntry { parser: name, entry })
        .collect();
    (entries, parser.name().to_string())
}
