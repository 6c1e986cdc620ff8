//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use regex::Regex;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// Table the handler reads and writes unless `REPORTS_TABLE` says otherwise.
pub const DEFAULT_REPORTS_TABLE: &str = "t_p82812282_daily_report_app.reports";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Optionally schema-qualified; checked by [`validate_table_name`].
    pub reports_table: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Database Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Settings ---
        let reports_table =
            lookup("REPORTS_TABLE").unwrap_or_else(|| DEFAULT_REPORTS_TABLE.to_string());
        validate_table_name(&reports_table)?;

        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", &lookup, 5u32)?;
        let acquire_timeout =
            Duration::from_secs(parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", &lookup, 10u64)?);

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            reports_table,
            max_connections,
            acquire_timeout,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

const TABLE_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$";

/// The table name is spliced into SQL text, so only bare identifiers pass.
/// Runs once at startup.
pub fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("REPORTS_TABLE".to_string(), reason);
    let pattern = Regex::new(TABLE_NAME_PATTERN).map_err(|e| invalid(e.to_string()))?;
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(invalid(format!(
            "'{}' is not a plain or schema-qualified identifier",
            name
        )))
    }
}
