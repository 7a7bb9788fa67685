//! HTTP handlers for date-range reports
//!
//! Each report route answers GET with the form schema and POST with the
//! report rows for the submitted inclusive date range.

use axum::{
    extract::{Form, State},
    Json,
};

use crate::error::AppResult;
use crate::services::reporting::{
    ReportRange, ReportingService, StockInReportRow, StockOutByCustomerReportRow,
    StockOutReportRow,
};
use crate::AppState;

fn range_form_schema(report: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "report": report,
        "method": "POST",
        "fields": {
            "start_date": "YYYY-MM-DD",
            "end_date": "YYYY-MM-DD"
        }
    }))
}

/// Describe the stock-in report form
pub async fn stock_in_report_form() -> Json<serde_json::Value> {
    range_form_schema("stock_in")
}

/// Stock-in movements within the submitted range
pub async fn stock_in_report(
    State(state): State<AppState>,
    Form(range): Form<ReportRange>,
) -> AppResult<Json<Vec<StockInReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.stock_in_report(range).await?;
    Ok(Json(rows))
}

/// Describe the stock-out report form
pub async fn stock_out_report_form() -> Json<serde_json::Value> {
    range_form_schema("stock_out")
}

/// Stock-out movements within the submitted range
pub async fn stock_out_report(
    State(state): State<AppState>,
    Form(range): Form<ReportRange>,
) -> AppResult<Json<Vec<StockOutReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.stock_out_report(range).await?;
    Ok(Json(rows))
}

/// Describe the stock-out-by-customer report form
pub async fn stock_out_by_customer_report_form() -> Json<serde_json::Value> {
    range_form_schema("stock_out_by_customer")
}

/// Stock-out movements within the submitted range, with customer store numbers
pub async fn stock_out_by_customer_report(
    State(state): State<AppState>,
    Form(range): Form<ReportRange>,
) -> AppResult<Json<Vec<StockOutByCustomerReportRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.stock_out_by_customer_report(range).await?;
    Ok(Json(rows))
}
