use axum::{Json, extract::State};
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::models::FileListResponse;
use crate::state::AppState;

/// Regular files directly inside the log directory, sorted by name.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let dir = &state.settings.log_directory;

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        warn!(directory = %dir.display(), error = %e, "Cannot list log directory");
        match e.kind() {
            ErrorKind::NotFound => ApiError::not_found(format!(
                "Log directory not found: {} does not exist",
                dir.display()
            )),
            _ => ApiError::internal(format!("Cannot list {}: {e}", dir.display())),
        }
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::internal(format!("Cannot list {}: {e}", dir.display())))?
    {
        // follows symlinks; dangling links are skipped
        let is_file = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            files.push(name);
        }
    }
    files.sort();

    Ok(Json(FileListResponse {
        files,
        directory: dir.display().to_string(),
    }))
}
