//! crates/daily_report_core/src/domain.rs
//!
//! Defines the pure, core data structures for the daily report service.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};

/// Identifier generated by storage when a report is inserted.
pub type ReportId = i64;

/// Identity used when a request carries no `X-User-Id` header.
///
/// Every anonymous caller lands in this one partition.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Hours recorded when a new report does not state any.
pub const DEFAULT_HOURS: i32 = 8;

/// A persisted daily report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub user_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub tasks: String,
    pub achievements: String,
    pub plans: String,
    pub hours: i32,
    pub created_at: DateTime<Utc>,
}

/// Raw, unvalidated input for a new report. Every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub tasks: Option<String>,
    pub achievements: Option<String>,
    pub plans: Option<String>,
    pub hours: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title and tasks are required")]
    MissingTitleOrTasks,
}

/// A report that passed validation and is ready to be inserted.
///
/// Can only be built through [`NewReport::from_draft`], so `title` and `tasks`
/// are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    date: NaiveDate,
    title: String,
    tasks: String,
    achievements: String,
    plans: String,
    hours: i32,
}

impl NewReport {
    /// Trims the text fields, applies defaults and rejects empty `title`/`tasks`.
    ///
    /// `today` is the date used when the draft carries none.
    pub fn from_draft(draft: ReportDraft, today: NaiveDate) -> Result<Self, ValidationError> {
        let title = trimmed(draft.title);
        let tasks = trimmed(draft.tasks);
        if title.is_empty() || tasks.is_empty() {
            return Err(ValidationError::MissingTitleOrTasks);
        }

        Ok(Self {
            date: draft.date.unwrap_or(today),
            title,
            tasks,
            achievements: trimmed(draft.achievements),
            plans: trimmed(draft.plans),
            hours: draft.hours.unwrap_or(DEFAULT_HOURS),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tasks(&self) -> &str {
        &self.tasks
    }

    pub fn achievements(&self) -> &str {
        &self.achievements
    }

    pub fn plans(&self) -> &str {
        &self.plans
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Window applied to a report listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 50;
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Aggregates over one user's reports.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportStats {
    pub total_reports: i64,
    pub avg_hours: f64,
    pub total_hours: i64,
    /// Reports dated within the trailing week, today included.
    pub week_reports: i64,
}
