//! Inventory and customer management service.
//!
//! Tracks stock items, records stock-in/stock-out movements tied to
//! customers, keeps an append-only audit trail, produces date-range reports
//! and uploads database snapshots to Google Drive on demand.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Arc<Config>,
}
