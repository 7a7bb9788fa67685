//! Shared test fixtures: a scratch SQLite database per test

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use gestao_estoque::services::customers::{CustomerInput, CustomerService};
use gestao_estoque::services::inventory::{InventoryService, StockInInput, StockItem};

/// Fresh migrated pool over a unique temporary database file
pub async fn test_pool() -> SqlitePool {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "gestao_test_{}_{}.db",
        std::process::id(),
        n
    ));
    let _ = std::fs::remove_file(&path);

    let url = format!("sqlite://{}?mode=rwc", path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

/// Register a throwaway customer and return its id
pub async fn seed_customer(pool: &SqlitePool) -> i64 {
    let customer = CustomerService::new(pool.clone())
        .register(CustomerInput {
            region: "Sul".to_string(),
            city: "Curitiba".to_string(),
            store_number: "42".to_string(),
            store_power: "media".to_string(),
            cim_number: "CIM-042".to_string(),
            address: "Rua das Araucarias, 100".to_string(),
        })
        .await
        .expect("seed customer");
    customer.id
}

/// Record a stock-in and return the created item
pub async fn seed_item(pool: &SqlitePool, name: &str, barcode: &str, quantity: i64) -> StockItem {
    InventoryService::new(pool.clone())
        .record_stock_in(StockInInput {
            name: name.to_string(),
            barcode: barcode.to_string(),
            quantity,
            expiry_date: "2030-01-01".to_string(),
        })
        .await
        .expect("seed stock item")
}

/// Current quantity on hand for an item
pub async fn quantity_on_hand(pool: &SqlitePool, item_id: i64) -> i64 {
    sqlx::query_scalar("SELECT quantity FROM stock_items WHERE id = ?1")
        .bind(item_id)
        .fetch_one(pool)
        .await
        .expect("read quantity")
}

/// Number of audit entries
pub async fn audit_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM audit_entries")
        .fetch_one(pool)
        .await
        .expect("count audit entries")
}
