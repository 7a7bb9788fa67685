//! HTTP handlers for the customer registry

use axum::{
    extract::{Form, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::services::customers::{Customer, CustomerInput, CustomerService};
use crate::AppState;

/// List all registered customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list().await?;
    Ok(Json(customers))
}

/// Register a customer from a submitted form
pub async fn register_customer(
    State(state): State<AppState>,
    Form(input): Form<CustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.db);
    let customer = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}
