//! Health check handler
//!
//! Reports process liveness and whether the inventory database answers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Liveness probe: pings the inventory store with a trivial query
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "reachable".to_string(),
        Err(_) => "unreachable".to_string(),
    };

    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}
