//! Route definitions for the inventory management service
//!
//! Paths follow the legacy application verbatim.

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create application routes
pub fn app_routes() -> Router<AppState> {
    Router::new()
        // Stock listing and stock-in
        .route(
            "/estoque",
            get(handlers::list_stock).post(handlers::record_stock_in),
        )
        // Stock-out
        .route(
            "/saida",
            get(handlers::stock_out_form).post(handlers::record_stock_out),
        )
        // Customer registry
        .route(
            "/clientes",
            get(handlers::list_customers).post(handlers::register_customer),
        )
        // Audit trail
        .route("/auditoria", get(handlers::list_audit))
        .route("/export_auditoria", get(handlers::export_audit))
        // Date-range reports
        .route(
            "/relatorio_entradas",
            get(handlers::stock_in_report_form).post(handlers::stock_in_report),
        )
        .route(
            "/relatorio_saidas",
            get(handlers::stock_out_report_form).post(handlers::stock_out_report),
        )
        .route(
            "/relatorio_saidas_clientes",
            get(handlers::stock_out_by_customer_report_form)
                .post(handlers::stock_out_by_customer_report),
        )
        // Cloud backup
        .route("/backup_nuvem", get(handlers::backup_to_drive))
}
