//! Inventory ledger tests
//!
//! Covers the quantity invariant: on-hand equals stock-in minus stock-out,
//! never negative, including under concurrent stock-outs.

mod common;

use proptest::prelude::*;

use gestao_estoque::error::AppError;
use gestao_estoque::services::inventory::{InventoryService, StockInInput, StockOutInput};

use common::{audit_count, quantity_on_hand, seed_customer, seed_item, test_pool};

#[tokio::test]
async fn stock_in_creates_item_event_and_audit() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());

    let item = service
        .record_stock_in(StockInInput {
            name: "WidgetA".to_string(),
            barcode: "111".to_string(),
            quantity: 10,
            expiry_date: "2030-01-01".to_string(),
        })
        .await
        .expect("stock-in");

    assert_eq!(item.quantity, 10);
    assert_eq!(quantity_on_hand(&pool, item.id).await, 10);

    let events: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_in_events WHERE stock_item_id = ?1")
            .bind(item.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(events, 1);

    // Exactly one audit entry, referencing the item
    assert_eq!(audit_count(&pool).await, 1);
    let action: String = sqlx::query_scalar("SELECT action FROM audit_entries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(action.contains("WidgetA"));
    assert!(action.contains(&item.id.to_string()));
}

#[tokio::test]
async fn stock_in_rejects_nonpositive_quantity() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());

    let err = service
        .record_stock_in(StockInInput {
            name: "WidgetA".to_string(),
            barcode: "111".to_string(),
            quantity: 0,
            expiry_date: "2030-01-01".to_string(),
        })
        .await
        .expect_err("zero quantity must be rejected");

    assert!(matches!(err, AppError::Validation { .. }));

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0);
    assert_eq!(audit_count(&pool).await, 0);
}

#[tokio::test]
async fn stock_in_rejects_malformed_expiry_date() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());

    let err = service
        .record_stock_in(StockInInput {
            name: "WidgetA".to_string(),
            barcode: "111".to_string(),
            quantity: 5,
            expiry_date: "not-a-date".to_string(),
        })
        .await
        .expect_err("malformed date must be rejected");

    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn stock_out_scenario_decrements_then_rejects_overdraw() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let customer_id = seed_customer(&pool).await;

    let item = seed_item(&pool, "WidgetA", "111", 10).await;
    assert_eq!(quantity_on_hand(&pool, item.id).await, 10);

    let event = service
        .record_stock_out(StockOutInput {
            barcode: "111".to_string(),
            quantity: 4,
            customer_id,
        })
        .await
        .expect("stock-out of 4");
    assert_eq!(event.quantity, 4);
    assert_eq!(event.stock_item_id, item.id);
    assert_eq!(quantity_on_hand(&pool, item.id).await, 6);

    let err = service
        .record_stock_out(StockOutInput {
            barcode: "111".to_string(),
            quantity: 100,
            customer_id,
        })
        .await
        .expect_err("overdraw must be rejected");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    // Rejection leaves the quantity and the event table untouched
    assert_eq!(quantity_on_hand(&pool, item.id).await, 6);
    let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_out_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(events, 1);
}

#[tokio::test]
async fn stock_out_rejects_unknown_customer() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let item = seed_item(&pool, "WidgetA", "111", 10).await;

    let err = service
        .record_stock_out(StockOutInput {
            barcode: "111".to_string(),
            quantity: 1,
            customer_id: 9999,
        })
        .await
        .expect_err("unknown customer must be rejected");
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(quantity_on_hand(&pool, item.id).await, 10);
    let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_out_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(events, 0);
}

#[tokio::test]
async fn stock_out_rejects_unknown_barcode() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let customer_id = seed_customer(&pool).await;

    let err = service
        .record_stock_out(StockOutInput {
            barcode: "no-such-barcode".to_string(),
            quantity: 1,
            customer_id,
        })
        .await
        .expect_err("unknown barcode must be rejected");
    assert!(matches!(err, AppError::InsufficientStock(_)));
}

#[tokio::test]
async fn replayed_sequence_matches_in_minus_out() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let customer_id = seed_customer(&pool).await;

    let item = seed_item(&pool, "WidgetA", "111", 50).await;

    // in 50, out 20, out 10, failed out 30, out 5 => 15 on hand
    for (quantity, should_succeed) in [(20, true), (10, true), (30, false), (5, true)] {
        let result = service
            .record_stock_out(StockOutInput {
                barcode: "111".to_string(),
                quantity,
                customer_id,
            })
            .await;
        assert_eq!(result.is_ok(), should_succeed, "quantity {}", quantity);
    }

    assert_eq!(quantity_on_hand(&pool, item.id).await, 15);

    let total_out: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM stock_out_events WHERE stock_item_id = ?1",
    )
    .bind(item.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let total_in: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM stock_in_events WHERE stock_item_id = ?1",
    )
    .bind(item.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(total_in - total_out, 15);
}

#[tokio::test]
async fn concurrent_stock_outs_never_overdeduct() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let customer_id = seed_customer(&pool).await;
    let item = seed_item(&pool, "WidgetA", "111", 10).await;

    // Two simultaneous withdrawals of 6 against 10 on hand: exactly one may
    // pass the sufficiency check.
    let mut tasks = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .record_stock_out(StockOutInput {
                    barcode: "111".to_string(),
                    quantity: 6,
                    customer_id,
                })
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1, "exactly one withdrawal should succeed");
    assert_eq!(quantity_on_hand(&pool, item.id).await, 4);
}

#[tokio::test]
async fn cancelled_stock_out_does_not_wedge_the_pool() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());
    let customer_id = seed_customer(&pool).await;
    let item = seed_item(&pool, "WidgetA", "111", 100).await;

    // Drop in-flight withdrawals at arbitrary points, the way a handler
    // future is dropped when the client disconnects. Any transaction left
    // open by a dropped future must roll back before its connection is
    // reused.
    for _ in 0..10 {
        let withdraw = service.record_stock_out(StockOutInput {
            barcode: "111".to_string(),
            quantity: 1,
            customer_id,
        });
        let _ = tokio::time::timeout(std::time::Duration::from_micros(50), withdraw).await;
    }

    // The pool must still serve write transactions afterwards.
    let event = service
        .record_stock_out(StockOutInput {
            barcode: "111".to_string(),
            quantity: 2,
            customer_id,
        })
        .await
        .expect("stock-out after cancellations");
    assert_eq!(event.quantity, 2);

    // No partial commits either: on hand still equals stock-in minus the
    // withdrawals that actually committed.
    let total_out: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM stock_out_events WHERE stock_item_id = ?1",
    )
    .bind(item.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(quantity_on_hand(&pool, item.id).await, 100 - total_out);
}

#[tokio::test]
async fn list_items_derives_expired_subset() {
    let pool = test_pool().await;
    let service = InventoryService::new(pool.clone());

    seed_item(&pool, "Fresh", "f-1", 3).await;
    service
        .record_stock_in(StockInInput {
            name: "Stale".to_string(),
            barcode: "s-1".to_string(),
            quantity: 2,
            expiry_date: "2001-01-01".to_string(),
        })
        .await
        .expect("stock-in of expired item");

    let overview = service.list_items().await.expect("list items");
    assert_eq!(overview.items.len(), 2);
    assert_eq!(overview.expired.len(), 1);
    assert_eq!(overview.expired[0].name, "Stale");
}

proptest! {
    /// Gated replay arithmetic: on-hand always equals accepted stock-in
    /// minus accepted stock-out, and never drops below zero.
    #[test]
    fn gated_replay_never_negative(ops in prop::collection::vec((any::<bool>(), 1i64..100), 0..64)) {
        let mut on_hand = 0i64;
        let mut total_in = 0i64;
        let mut total_out = 0i64;

        for (is_in, quantity) in ops {
            if is_in {
                on_hand += quantity;
                total_in += quantity;
            } else if on_hand >= quantity {
                on_hand -= quantity;
                total_out += quantity;
            }
            // Rejected withdrawals change nothing.
        }

        prop_assert_eq!(on_hand, total_in - total_out);
        prop_assert!(on_hand >= 0);
    }
}
