//! HTTP handlers for stock listing, stock-in and stock-out

use axum::{
    extract::{Form, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::services::inventory::{
    InventoryService, StockInInput, StockItem, StockOutEvent, StockOutInput, StockOverview,
};
use crate::AppState;

/// List all stock items plus the expired subset
pub async fn list_stock(State(state): State<AppState>) -> AppResult<Json<StockOverview>> {
    let service = InventoryService::new(state.db);
    let overview = service.list_items().await?;
    Ok(Json(overview))
}

/// Record a stock-in from a submitted form
pub async fn record_stock_in(
    State(state): State<AppState>,
    Form(input): Form<StockInInput>,
) -> AppResult<(StatusCode, Json<StockItem>)> {
    let service = InventoryService::new(state.db);
    let item = service.record_stock_in(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Describe the stock-out form fields
pub async fn stock_out_form() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "operation": "stock_out",
        "method": "POST",
        "fields": {
            "barcode": "string",
            "quantity": "positive integer",
            "customer_id": "existing customer id"
        }
    }))
}

/// Record a stock-out from a submitted form
pub async fn record_stock_out(
    State(state): State<AppState>,
    Form(input): Form<StockOutInput>,
) -> AppResult<(StatusCode, Json<StockOutEvent>)> {
    let service = InventoryService::new(state.db);
    let event = service.record_stock_out(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
