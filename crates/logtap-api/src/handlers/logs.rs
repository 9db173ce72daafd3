use axum::{
    Json,
    extract::{Query, State},
};
use logtap_core::{
    filter_lines, has_path_separator, is_filename_valid, is_limit_valid, is_search_term_valid,
    validate_regex,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{LogQuery, LogResponse};
use crate::state::AppState;

pub const ERROR_INVALID_FILENAME: &str = r#"Invalid filename: must not contain ".." or start with "/""#;
pub const ERROR_LONG_SEARCH_TERM: &str = "Search term is too long: must be 100 characters or fewer";
pub const ERROR_INVALID_LIMIT: &str = "Invalid limit value: must be between 1 and 1000";

pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogQuery>,
) -> Result<Json<LogResponse>, ApiError> {
    let lines = read_lines(&state, &params).await?;

    info!(filename = %params.filename, limit = params.limit, count = lines.len(), "Logs request");

    Ok(Json(LogResponse {
        count: lines.len(),
        lines,
        filename: params.filename,
    }))
}

fn validate(params: &LogQuery) -> Result<(), ApiError> {
    if !is_filename_valid(&params.filename) || has_path_separator(&params.filename) {
        return Err(ApiError::bad_request(ERROR_INVALID_FILENAME));
    }
    if !params.term.is_empty() && !is_search_term_valid(&params.term) {
        return Err(ApiError::bad_request(ERROR_LONG_SEARCH_TERM));
    }
    if !is_limit_valid(params.limit) {
        return Err(ApiError::bad_request(ERROR_INVALID_LIMIT));
    }
    if let Some(pattern) = params
        .regex
        .as_deref()
        .filter(|r| params.strict_regex && !r.is_empty())
    {
        validate_regex(pattern)
            .map_err(|e| ApiError::bad_request(format!("Invalid regex: {e}")))?;
    }
    Ok(())
}

/// Validate, tail under the request deadline, then filter.
pub(crate) async fn read_lines(state: &AppState, params: &LogQuery) -> Result<Vec<String>, ApiError> {
    validate(params)?;

    let path = state.log_path(&params.filename);
    // validated to 1..=1000
    let limit = params.limit as usize;

    let read = state.reader.tail_async(&path, limit);
    let lines = match tokio::time::timeout(state.settings.request_timeout(), read).await {
        Ok(Ok(lines)) => lines,
        Ok(Err(err)) => {
            warn!(path = %path.display(), error = %err, "Log read rejected");
            return Err(err.into());
        }
        Err(_) => {
            warn!(path = %path.display(), timeout_secs = state.settings.request_timeout_secs, "Log read timed out");
            return Err(ApiError::unavailable(format!(
                "Timed out reading {}",
                params.filename
            )));
        }
    };

    Ok(filter_lines(
        lines,
        Some(params.term.as_str()),
        params.regex.as_deref(),
        params.case_sensitive,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(regex: Option<&str>, strict_regex: bool) -> LogQuery {
        LogQuery {
            filename: "syslog".to_string(),
            term: String::new(),
            regex: regex.map(str::to_string),
            limit: 50,
            case_sensitive: true,
            strict_regex,
        }
    }

    #[test]
    fn test_strict_regex_only_checks_when_asked() {
        assert!(validate(&query(Some("a("), false)).is_ok());
        assert!(validate(&query(Some(""), true)).is_ok());
        assert!(validate(&query(None, true)).is_ok());
        assert!(validate(&query(Some("^error: .*$"), true)).is_ok());

        let err = validate(&query(Some("a("), true)).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
