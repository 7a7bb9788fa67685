//! Customer registry service
//!
//! Customers are immutable after creation and never deleted.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::AppResult;
use crate::services::AuditService;

/// Customer registry service
#[derive(Clone)]
pub struct CustomerService {
    db: SqlitePool,
}

/// A registered customer (store)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub region: String,
    pub city: String,
    pub store_number: String,
    pub store_power: String,
    pub cim_number: String,
    pub address: String,
}

/// Input for registering a customer; all six fields are mandatory
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub store_number: String,
    #[validate(length(min = 1))]
    pub store_power: String,
    #[validate(length(min = 1))]
    pub cim_number: String,
    #[validate(length(min = 1))]
    pub address: String,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Register a customer; the insert and its audit entry commit together
    pub async fn register(&self, input: CustomerInput) -> AppResult<Customer> {
        input.validate()?;

        let mut tx = self.db.begin().await?;

        let customer_id = sqlx::query(
            "INSERT INTO customers (region, city, store_number, store_power, cim_number, address) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&input.region)
        .bind(&input.city)
        .bind(&input.store_number)
        .bind(&input.store_power)
        .bind(&input.cim_number)
        .bind(&input.address)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        AuditService::append(
            &mut *tx,
            &format!(
                "Customer registered: store {} (customer {})",
                input.store_number, customer_id
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(Customer {
            id: customer_id,
            region: input.region,
            city: input.city,
            store_number: input.store_number,
            store_power: input.store_power,
            cim_number: input.cim_number,
            address: input.address,
        })
    }

    /// All customers in storage order
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, region, city, store_number, store_power, cim_number, address \
             FROM customers ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }
}
