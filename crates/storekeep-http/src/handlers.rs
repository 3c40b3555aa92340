use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use camino::Utf8PathBuf;

use super::error::ApiError;
use super::models::{
    BackupItem, CleanRequest, CleanResponse, CreatedResponse, ListResponse, RestoreRequest,
    RestoreResponse,
};
use super::state::ApiState;

pub async fn create_backup(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let created = state.manager.create_backup(&state.backup_dir).await?;
    Ok(Json(CreatedResponse::new(
        "Backup created successfully",
        &created,
    )))
}

pub async fn auto_backup(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .manager
        .auto_backup(&state.backup_dir, state.keep_count)
        .await?;
    Ok(Json(CreatedResponse::new(
        "Auto backup completed successfully",
        &created,
    )))
}

pub async fn list_backups(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let entries = state.manager.list_backups(&state.backup_dir).await?;
    let backups: Vec<BackupItem> = entries.into_iter().map(BackupItem::from).collect();
    Ok(Json(ListResponse {
        success: true,
        count: backups.len(),
        backups,
    }))
}

pub async fn restore_backup(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: RestoreRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;

    let backup_path = match request.backup_path.filter(|p| !p.trim().is_empty()) {
        Some(path) => Utf8PathBuf::from(path),
        None => return Err(ApiError::bad_request("backupPath is required")),
    };

    let summary = state
        .manager
        .restore_backup(&backup_path, request.clear_before_restore)
        .await?;

    Ok(Json(RestoreResponse {
        success: true,
        message: "Backup restored successfully",
        results: summary.inserted,
    }))
}

/// An empty body keeps the configured default count.
pub async fn clean_backups(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: CleanRequest = if body.is_empty() {
        CleanRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?
    };

    let keep_count = request.keep_count.unwrap_or(state.keep_count);
    let deleted = state
        .manager
        .clean_old_backups(keep_count, &state.backup_dir)
        .await?;

    Ok(Json(CleanResponse {
        success: true,
        deleted,
    }))
}
