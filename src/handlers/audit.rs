//! HTTP handlers for the audit trail

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::audit::{AuditEntry, AuditService};
use crate::AppState;

/// List all audit entries, most recent first
pub async fn list_audit(State(state): State<AppState>) -> AppResult<Json<Vec<AuditEntry>>> {
    let service = AuditService::new(state.db);
    let entries = service.list().await?;
    Ok(Json(entries))
}

/// Export the audit trail to the configured CSV file
pub async fn export_audit(State(state): State<AppState>) -> AppResult<String> {
    let path = state.config.audit.export_path.clone();
    let service = AuditService::new(state.db);
    let count = service.export_to_file(&path).await?;
    Ok(format!("Exported {} audit entries to {}", count, path))
}
