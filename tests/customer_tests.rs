//! Customer registry tests

mod common;

use gestao_estoque::error::AppError;
use gestao_estoque::services::customers::{CustomerInput, CustomerService};

use common::{audit_count, test_pool};

fn valid_input() -> CustomerInput {
    CustomerInput {
        region: "Sul".to_string(),
        city: "Curitiba".to_string(),
        store_number: "42".to_string(),
        store_power: "media".to_string(),
        cim_number: "CIM-042".to_string(),
        address: "Rua das Araucarias, 100".to_string(),
    }
}

#[tokio::test]
async fn register_persists_customer_and_audit_entry() {
    let pool = test_pool().await;
    let service = CustomerService::new(pool.clone());

    let customer = service.register(valid_input()).await.expect("register");
    assert_eq!(customer.store_number, "42");

    let listed = service.list().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, customer.id);

    assert_eq!(audit_count(&pool).await, 1);
    let action: String = sqlx::query_scalar("SELECT action FROM audit_entries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(action.contains("42"));
}

#[tokio::test]
async fn register_rejects_any_empty_field() {
    let pool = test_pool().await;
    let service = CustomerService::new(pool.clone());

    let blank_each: [fn(&mut CustomerInput); 6] = [
        |i: &mut CustomerInput| i.region.clear(),
        |i: &mut CustomerInput| i.city.clear(),
        |i: &mut CustomerInput| i.store_number.clear(),
        |i: &mut CustomerInput| i.store_power.clear(),
        |i: &mut CustomerInput| i.cim_number.clear(),
        |i: &mut CustomerInput| i.address.clear(),
    ];

    for blank in blank_each {
        let mut input = valid_input();
        blank(&mut input);
        let err = service
            .register(input)
            .await
            .expect_err("empty field must be rejected");
        assert!(matches!(err, AppError::Validation { .. }));
    }

    // Nothing persisted, nothing audited
    let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(customers, 0);
    assert_eq!(audit_count(&pool).await, 0);
}
