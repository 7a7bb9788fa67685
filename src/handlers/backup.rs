//! HTTP handler for the on-demand Google Drive backup

use axum::extract::State;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::external::DriveClient;
use crate::services::AuditService;
use crate::AppState;

/// Upload a snapshot of the database file to Google Drive
pub async fn backup_to_drive(State(state): State<AppState>) -> AppResult<String> {
    let backup = &state.config.backup;

    let bytes = tokio::fs::read(&backup.database_file).await.map_err(|e| {
        AppError::ExternalService(format!(
            "cannot read database file {}: {}",
            backup.database_file, e
        ))
    })?;

    let name = format!("gestao_backup_{}.db", Utc::now().format("%Y%m%d_%H%M%S"));

    let client = DriveClient::new(backup.token_path.clone(), backup.upload_endpoint.clone());
    let file_id = client.upload_snapshot(bytes, &name).await?;

    AuditService::new(state.db.clone())
        .log(&format!("Backup uploaded to Google Drive: {}", file_id))
        .await?;

    tracing::info!("Database snapshot {} uploaded as Drive file {}", name, file_id);

    Ok(format!(
        "Backup uploaded to Google Drive (file id {})",
        file_id
    ))
}
