//! In-memory `ReportStore` used by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Local, Utc};
use daily_report_core::domain::{NewReport, Pagination, Report, ReportId, ReportStats};
use daily_report_core::ports::{PortError, PortResult, ReportConnection, ReportStore};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    rows: Vec<Report>,
    next_id: ReportId,
    connects: usize,
    open: usize,
}

/// Behaves like the reports table, and counts how connections are used.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    unreachable: bool,
    broken_queries: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `connect` fails.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Connections open, every query fails.
    pub fn broken() -> Self {
        Self {
            broken_queries: true,
            ..Self::default()
        }
    }

    pub fn connects(&self) -> usize {
        self.inner.lock().unwrap().connects
    }

    pub fn open_connections(&self) -> usize {
        self.inner.lock().unwrap().open
    }

    pub fn rows(&self) -> Vec<Report> {
        self.inner.lock().unwrap().rows.clone()
    }

    pub fn rows_for(&self, user_id: &str) -> Vec<Report> {
        self.rows()
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn connect(&self) -> PortResult<Box<dyn ReportConnection>> {
        if self.unreachable {
            return Err(PortError::Connection(
                "connection to server at \"db\" failed: Connection refused".to_string(),
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.connects += 1;
        inner.open += 1;
        Ok(Box::new(MemoryConnection {
            inner: Arc::clone(&self.inner),
            broken: self.broken_queries,
        }))
    }
}

struct MemoryConnection {
    inner: Arc<Mutex<Inner>>,
    broken: bool,
}

impl MemoryConnection {
    fn check(&self) -> PortResult<()> {
        if self.broken {
            return Err(PortError::Unexpected(
                "relation \"reports\" does not exist".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.open -= 1;
        }
    }
}

#[async_trait]
impl ReportConnection for MemoryConnection {
    async fn list_reports(&mut self, user_id: &str, page: Pagination) -> PortResult<Vec<Report>> {
        self.check()?;
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Report> = inner
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn report_stats(&mut self, user_id: &str) -> PortResult<ReportStats> {
        self.check()?;
        let inner = self.inner.lock().unwrap();
        let rows: Vec<&Report> = inner.rows.iter().filter(|r| r.user_id == user_id).collect();
        let week_start = Local::now().date_naive() - Duration::days(7);

        let total_reports = rows.len() as i64;
        let total_hours: i64 = rows.iter().map(|r| r.hours as i64).sum();
        let avg_hours = if total_reports == 0 {
            0.0
        } else {
            total_hours as f64 / total_reports as f64
        };
        let week_reports = rows.iter().filter(|r| r.date >= week_start).count() as i64;

        Ok(ReportStats {
            total_reports,
            avg_hours,
            total_hours,
            week_reports,
        })
    }

    async fn create_report(&mut self, user_id: &str, report: NewReport) -> PortResult<Report> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let row = Report {
            id,
            user_id: user_id.to_string(),
            date: report.date(),
            title: report.title().to_string(),
            tasks: report.tasks().to_string(),
            achievements: report.achievements().to_string(),
            plans: report.plans().to_string(),
            hours: report.hours(),
            // Strictly increasing, so insertion order breaks date ties.
            created_at: Utc::now() + Duration::milliseconds(id),
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn delete_report(&mut self, user_id: &str, id: ReportId) -> PortResult<bool> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner.rows.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(inner.rows.len() < before)
    }
}
