//! crates/daily_report_core/src/ports.rs
//!
//! Defines the storage contract for the report handler.
//! The handler only talks to these traits, so the core stays independent of
//! the concrete database driver.

use async_trait::async_trait;

use crate::domain::{NewReport, Pagination, Report, ReportId, ReportStats};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports (Traits)
//=========================================================================================

/// Hands out one connection per request.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Acquires a connection. It is released when the returned value is dropped,
    /// whichever way the request ends.
    async fn connect(&self) -> PortResult<Box<dyn ReportConnection>>;
}

/// The queries a single request may run. Every call is scoped to `user_id`.
#[async_trait]
pub trait ReportConnection: Send {
    /// Reports ordered by `date` descending, then `created_at` descending.
    async fn list_reports(&mut self, user_id: &str, page: Pagination) -> PortResult<Vec<Report>>;

    async fn report_stats(&mut self, user_id: &str) -> PortResult<ReportStats>;

    /// Inserts and commits, returning the stored row with its generated fields.
    async fn create_report(&mut self, user_id: &str, report: NewReport) -> PortResult<Report>;

    /// Deletes and commits. `false` when no row matched both `id` and `user_id`.
    async fn delete_report(&mut self, user_id: &str, id: ReportId) -> PortResult<bool>;
}
