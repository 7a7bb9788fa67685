//! Reporting service
//!
//! Date-range projections over the movement tables joined to items and
//! customers. Both range endpoints are inclusive, interpreted as whole
//! calendar days in UTC.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: SqlitePool,
}

/// Inclusive date range for a report
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReportRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Row of the stock-in report
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockInReportRow {
    pub id: i64,
    pub product: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Row of the stock-out report
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockOutReportRow {
    pub id: i64,
    pub product: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Row of the stock-out-by-customer report
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockOutByCustomerReportRow {
    pub id: i64,
    pub product: String,
    pub quantity: i64,
    pub customer: String,
    pub created_at: DateTime<Utc>,
}

impl ReportRange {
    /// Half-open UTC bounds [start, end) covering the inclusive day range
    fn bounds(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        if self.end_date < self.start_date {
            return Err(AppError::Validation {
                field: "end_date".to_string(),
                message: "end_date precedes start_date".to_string(),
            });
        }

        let start = self.start_date.and_time(NaiveTime::MIN).and_utc();
        let end = self
            .end_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::Validation {
                field: "end_date".to_string(),
                message: "end_date out of range".to_string(),
            })?
            .and_time(NaiveTime::MIN)
            .and_utc();

        Ok((start, end))
    }
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stock-in movements within the range, joined to item names
    pub async fn stock_in_report(&self, range: ReportRange) -> AppResult<Vec<StockInReportRow>> {
        let (start, end) = range.bounds()?;

        let rows = sqlx::query_as::<_, StockInReportRow>(
            "SELECT e.id, i.name AS product, e.quantity, e.created_at \
             FROM stock_in_events e JOIN stock_items i ON e.stock_item_id = i.id \
             WHERE e.created_at >= ?1 AND e.created_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Stock-out movements within the range, joined to item names
    pub async fn stock_out_report(&self, range: ReportRange) -> AppResult<Vec<StockOutReportRow>> {
        let (start, end) = range.bounds()?;

        let rows = sqlx::query_as::<_, StockOutReportRow>(
            "SELECT e.id, i.name AS product, e.quantity, e.created_at \
             FROM stock_out_events e JOIN stock_items i ON e.stock_item_id = i.id \
             WHERE e.created_at >= ?1 AND e.created_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Stock-out movements within the range, joined to item names and the
    /// receiving customer's store number
    pub async fn stock_out_by_customer_report(
        &self,
        range: ReportRange,
    ) -> AppResult<Vec<StockOutByCustomerReportRow>> {
        let (start, end) = range.bounds()?;

        let rows = sqlx::query_as::<_, StockOutByCustomerReportRow>(
            "SELECT e.id, i.name AS product, e.quantity, c.store_number AS customer, e.created_at \
             FROM stock_out_events e \
             JOIN stock_items i ON e.stock_item_id = i.id \
             JOIN customers c ON e.customer_id = c.id \
             WHERE e.created_at >= ?1 AND e.created_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
