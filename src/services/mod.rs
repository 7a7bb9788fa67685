//! Business logic services for the inventory management service

pub mod audit;
pub mod customers;
pub mod inventory;
pub mod reporting;

pub use audit::AuditService;
pub use customers::CustomerService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
