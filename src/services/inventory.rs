//! Inventory ledger service
//!
//! Owns the stock-quantity invariant: an item's quantity on hand always
//! equals the sum of its stock-in quantities minus the sum of its stock-out
//! quantities, and never goes below zero. Stock-out uses a conditional
//! decrement inside a write transaction so concurrent requests against the
//! same item cannot both pass the sufficiency check.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::AuditService;

/// Inventory ledger service
#[derive(Clone)]
pub struct InventoryService {
    db: SqlitePool,
}

/// A tracked stock item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockItem {
    pub id: i64,
    pub name: String,
    pub barcode: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
}

/// An immutable stock-in movement
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockInEvent {
    pub id: i64,
    pub stock_item_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// An immutable stock-out movement, attributed to a customer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockOutEvent {
    pub id: i64,
    pub stock_item_id: i64,
    pub quantity: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stock-in
#[derive(Debug, Deserialize, Validate)]
pub struct StockInInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub barcode: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Calendar date in `YYYY-MM-DD` form
    #[validate(length(min = 1))]
    pub expiry_date: String,
}

/// Input for recording a stock-out
#[derive(Debug, Deserialize, Validate)]
pub struct StockOutInput {
    #[validate(length(min = 1))]
    pub barcode: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub customer_id: i64,
}

/// All items plus the derived expired subset
#[derive(Debug, Clone, Serialize)]
pub struct StockOverview {
    pub items: Vec<StockItem>,
    pub expired: Vec<StockItem>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a stock-in: creates the stock item, its movement event and the
    /// audit entry as a single transaction.
    ///
    /// Repeated stock-in of the same barcode creates a new item row each
    /// time; there is no duplicate-barcode check or merge.
    pub async fn record_stock_in(&self, input: StockInInput) -> AppResult<StockItem> {
        input.validate()?;

        let expiry_date = NaiveDate::parse_from_str(&input.expiry_date, "%Y-%m-%d").map_err(
            |_| AppError::Validation {
                field: "expiry_date".to_string(),
                message: format!("`{}` is not a calendar date (YYYY-MM-DD)", input.expiry_date),
            },
        )?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let item_id = sqlx::query(
            "INSERT INTO stock_items (name, barcode, quantity, expiry_date) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&input.name)
        .bind(&input.barcode)
        .bind(input.quantity)
        .bind(expiry_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO stock_in_events (stock_item_id, quantity, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(item_id)
        .bind(input.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        AuditService::append(
            &mut *tx,
            &format!("Stock-in: {} (item {})", input.name, item_id),
        )
        .await?;

        tx.commit().await?;

        Ok(StockItem {
            id: item_id,
            name: input.name,
            barcode: input.barcode,
            quantity: input.quantity,
            expiry_date,
        })
    }

    /// Record a stock-out against the first item matching the barcode.
    ///
    /// Fails with `NotFound` if the customer does not exist and with
    /// `InsufficientStock` if no item matches or the quantity on hand is too
    /// low. The decrement, the movement event and the audit entry commit
    /// together or not at all; if the caller is cancelled mid-flight the
    /// pooled transaction rolls back on drop.
    pub async fn record_stock_out(&self, input: StockOutInput) -> AppResult<StockOutEvent> {
        input.validate()?;

        // Customers are immutable and never deleted, so this check cannot go
        // stale before the transaction below commits.
        let customer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)")
                .bind(input.customer_id)
                .fetch_one(&self.db)
                .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // The conditional decrement is the first statement of the
        // transaction: it takes the write lock directly, so concurrent
        // stock-outs queue on the busy timeout instead of racing the
        // sufficiency check. An early return drops the transaction, which
        // rolls back through the pool.
        let updated = sqlx::query_as::<_, (i64, i64)>(
            "UPDATE stock_items SET quantity = quantity - ?1 \
             WHERE id = (SELECT id FROM stock_items WHERE barcode = ?2 ORDER BY id LIMIT 1) \
               AND quantity >= ?1 \
             RETURNING id, quantity",
        )
        .bind(input.quantity)
        .bind(&input.barcode)
        .fetch_optional(&mut *tx)
        .await?;

        let (item_id, _remaining) = match updated {
            Some(row) => row,
            None => {
                // No row touched: distinguish a missing item from an overdraw
                let on_hand = sqlx::query_scalar::<_, i64>(
                    "SELECT quantity FROM stock_items WHERE barcode = ?1 ORDER BY id LIMIT 1",
                )
                .bind(&input.barcode)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match on_hand {
                    Some(on_hand) => AppError::InsufficientStock(format!(
                        "requested {} of barcode {}, only {} on hand",
                        input.quantity, input.barcode, on_hand
                    )),
                    None => AppError::InsufficientStock(format!(
                        "no stock item with barcode {}",
                        input.barcode
                    )),
                });
            }
        };

        let now = Utc::now();
        let event_id = sqlx::query(
            "INSERT INTO stock_out_events (stock_item_id, quantity, customer_id, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(item_id)
        .bind(input.quantity)
        .bind(input.customer_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        AuditService::append(
            &mut *tx,
            &format!(
                "Stock-out: {} of item {} to customer {}",
                input.quantity, item_id, input.customer_id
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(StockOutEvent {
            id: event_id,
            stock_item_id: item_id,
            quantity: input.quantity,
            customer_id: input.customer_id,
            created_at: now,
        })
    }

    /// All stock items plus the subset whose expiry date is strictly before
    /// today (derived at query time, never stored).
    pub async fn list_items(&self) -> AppResult<StockOverview> {
        let items = sqlx::query_as::<_, StockItem>(
            "SELECT id, name, barcode, quantity, expiry_date FROM stock_items ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        let today = Utc::now().date_naive();
        let expired = items
            .iter()
            .filter(|item| item.expiry_date < today)
            .cloned()
            .collect();

        Ok(StockOverview { items, expired })
    }
}
