//! HTTP handlers for the inventory management service

pub mod audit;
pub mod backup;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod reporting;

pub use audit::*;
pub use backup::*;
pub use customers::*;
pub use health::*;
pub use inventory::*;
pub use reporting::*;
