//! Configuration management for the inventory service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with GESTAO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Audit trail configuration
    pub audit: AuditConfig,

    /// Google Drive backup configuration
    pub backup: BackupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Path the audit CSV export is written to
    pub export_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupConfig {
    /// Path of the database file uploaded as a snapshot
    pub database_file: String,

    /// Path of the cached Google authorized-user token
    pub token_path: String,

    /// Drive v3 multipart upload endpoint
    pub upload_endpoint: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GESTAO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "sqlite://gestao.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("audit.export_path", "auditoria.csv")?
            .set_default("backup.database_file", "gestao.db")?
            .set_default("backup.token_path", "token.json")?
            .set_default(
                "backup.upload_endpoint",
                "https://www.googleapis.com/upload/drive/v3/files",
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GESTAO_ prefix)
            .add_source(
                Environment::with_prefix("GESTAO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
