//! External API integrations

pub mod drive;

pub use drive::DriveClient;
