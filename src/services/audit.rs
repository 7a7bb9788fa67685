//! Audit trail service
//!
//! Every mutating operation in the system appends exactly one entry here,
//! inside the same transaction as the rows it describes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};

/// Audit trail service
#[derive(Clone)]
pub struct AuditService {
    db: SqlitePool,
}

/// A single audit trail entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Append an entry with a server-assigned timestamp
    pub async fn log(&self, action: &str) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        Self::append(&mut conn, action).await
    }

    /// Append an entry on an existing connection, so callers can make the
    /// audit row part of their own transaction.
    pub async fn append(conn: &mut SqliteConnection, action: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO audit_entries (action, created_at) VALUES (?1, ?2)")
            .bind(action)
            .bind(Utc::now())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// All entries, most recent first
    pub async fn list(&self) -> AppResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT id, action, created_at FROM audit_entries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Serialize all entries to a CSV file, returning the row count
    pub async fn export_to_file(&self, path: &str) -> AppResult<usize> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT id, action, created_at FROM audit_entries ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        let mut wtr = csv::Writer::from_path(path)
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;

        wtr.write_record(["ID", "Action", "Timestamp"])
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        for entry in &entries {
            wtr.write_record([
                entry.id.to_string(),
                entry.action.clone(),
                entry.created_at.to_rfc3339(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        wtr.flush()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;

        Ok(entries.len())
    }
}
