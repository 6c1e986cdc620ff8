//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ReportStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use daily_report_core::domain::{NewReport, Pagination, Report, ReportId, ReportStats};
use daily_report_core::ports::{PortError, PortResult, ReportConnection, ReportStore};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Acquire, FromRow, PgPool, Postgres};
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ReportStore` port.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
    queries: Arc<ReportQueries>,
}

impl PgReportStore {
    /// Creates a new `PgReportStore` over an existing pool.
    ///
    /// `table` must already be a validated identifier, see
    /// [`crate::config::validate_table_name`].
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            queries: Arc::new(ReportQueries::for_table(table)),
        }
    }

    /// Builds a lazily connecting pool from the configuration.
    ///
    /// Nothing is dialed here; an unreachable database surfaces on the first
    /// request that needs it.
    pub fn from_config(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.database_url)?;
        Ok(Self::new(pool, &config.reports_table))
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn connect(&self) -> PortResult<Box<dyn ReportConnection>> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;
        debug!("Acquired database connection");
        Ok(Box::new(PgReportConnection {
            conn,
            queries: Arc::clone(&self.queries),
        }))
    }
}

/// One pooled connection, handed back to the pool on drop.
pub struct PgReportConnection {
    conn: PoolConnection<Postgres>,
    queries: Arc<ReportQueries>,
}

//=========================================================================================
// SQL Text
//=========================================================================================

/// Column list shared by every statement that returns full rows. The casts
/// keep decoding stable whether the table uses SERIAL/BIGSERIAL and
/// TIMESTAMP/TIMESTAMPTZ.
const REPORT_COLUMNS: &str = "id::BIGINT AS id, user_id, date, title, tasks, achievements, plans, \
     hours::INTEGER AS hours, created_at::TIMESTAMPTZ AS created_at";

#[derive(Debug)]
struct ReportQueries {
    list: String,
    totals: String,
    week_count: String,
    insert: String,
    delete: String,
}

impl ReportQueries {
    fn for_table(table: &str) -> Self {
        Self {
            list: format!(
                "SELECT {REPORT_COLUMNS} FROM {table} WHERE user_id = $1 \
                 ORDER BY date DESC, created_at DESC LIMIT $2 OFFSET $3"
            ),
            totals: format!(
                "SELECT COUNT(*) AS total_reports, \
                 COALESCE(AVG(hours), 0)::FLOAT8 AS avg_hours, \
                 COALESCE(SUM(hours), 0)::BIGINT AS total_hours \
                 FROM {table} WHERE user_id = $1"
            ),
            week_count: format!(
                "SELECT COUNT(*) AS week_reports FROM {table} \
                 WHERE user_id = $1 AND date >= CURRENT_DATE - INTERVAL '7 days'"
            ),
            insert: format!(
                "INSERT INTO {table} (user_id, date, title, tasks, achievements, plans, hours) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {REPORT_COLUMNS}"
            ),
            delete: format!(
                "DELETE FROM {table} WHERE id = $1 AND user_id = $2 RETURNING id::BIGINT"
            ),
        }
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ReportRecord {
    id: i64,
    user_id: String,
    date: NaiveDate,
    title: String,
    tasks: String,
    achievements: Option<String>,
    plans: Option<String>,
    hours: i32,
    created_at: DateTime<Utc>,
}
impl ReportRecord {
    fn to_domain(self) -> Report {
        Report {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            title: self.title,
            tasks: self.tasks,
            achievements: self.achievements.unwrap_or_default(),
            plans: self.plans.unwrap_or_default(),
            hours: self.hours,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct TotalsRecord {
    total_reports: i64,
    avg_hours: f64,
    total_hours: i64,
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `ReportConnection` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReportConnection for PgReportConnection {
    async fn list_reports(&mut self, user_id: &str, page: Pagination) -> PortResult<Vec<Report>> {
        let records = sqlx::query_as::<_, ReportRecord>(&self.queries.list)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(unexpected)?;

        let reports = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(reports)
    }

    async fn report_stats(&mut self, user_id: &str) -> PortResult<ReportStats> {
        let totals = sqlx::query_as::<_, TotalsRecord>(&self.queries.totals)
            .bind(user_id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(unexpected)?;

        let week_reports = sqlx::query_scalar::<_, i64>(&self.queries.week_count)
            .bind(user_id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(unexpected)?;

        Ok(ReportStats {
            total_reports: totals.total_reports,
            avg_hours: totals.avg_hours,
            total_hours: totals.total_hours,
            week_reports,
        })
    }

    async fn create_report(&mut self, user_id: &str, report: NewReport) -> PortResult<Report> {
        let mut tx = self.conn.begin().await.map_err(unexpected)?;

        let record = sqlx::query_as::<_, ReportRecord>(&self.queries.insert)
            .bind(user_id)
            .bind(report.date())
            .bind(report.title())
            .bind(report.tasks())
            .bind(report.achievements())
            .bind(report.plans())
            .bind(report.hours())
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn delete_report(&mut self, user_id: &str, id: ReportId) -> PortResult<bool> {
        let mut tx = self.conn.begin().await.map_err(unexpected)?;

        let deleted = sqlx::query_scalar::<_, i64>(&self.queries.delete)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(deleted.is_some())
    }
}
