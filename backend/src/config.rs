//! Configuration management for the MRP Requirements Consolidation Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MRP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::StockMergePolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Optical order-extraction service configuration
    pub extraction: ExtractionConfig,

    /// Requirement plan behavior
    pub plan: PlanConfig,
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
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Order extraction API endpoint
    pub endpoint: String,

    /// Optional API key for the extraction endpoint
    pub api_key: Option<String>,

    /// Request timeout in seconds; expiry counts as an extraction failure
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanConfig {
    /// How stock detected on successive scans merges into an existing row
    pub stock_merge_policy: StockMergePolicy,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MRP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("extraction.timeout_seconds", 30)?
            .set_default("plan.stock_merge_policy", "accumulate")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MRP_ prefix)
            .add_source(
                Environment::with_prefix("MRP")
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
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
