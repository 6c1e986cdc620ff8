//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::http::StatusCode;
use daily_report_core::{PortError, ValidationError};
use std::num::ParseIntError;

/// The primary error type for the `api` service.
///
/// The `Display` text of every variant is what a client sees in the
/// `{"error": ...}` body, so request-path variants carry no prefix.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before anything was persisted.
    #[error("{0}")]
    Validation(String),

    /// The addressed record does not exist for this user.
    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Represents an error that propagated up from the storage port.
    #[error(transparent)]
    Port(#[from] PortError),

    /// The request body was not a valid report payload.
    #[error(transparent)]
    Payload(#[from] serde_json::Error),

    /// A numeric query parameter could not be parsed.
    #[error(transparent)]
    InvalidInteger(#[from] ParseIntError),

    /// A numeric `hours` value that does not fit an integer column.
    #[error("invalid hours value: {0}")]
    InvalidHours(f64),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}
