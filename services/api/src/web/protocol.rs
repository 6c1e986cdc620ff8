//! services/api/src/web/protocol.rs
//!
//! Defines the JSON bodies exchanged between clients and the report handler.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use daily_report_core::domain::{Report, ReportDraft, ReportStats};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Bodies Sent FROM the Client TO the Server
//=========================================================================================

/// The body of a create request. Every field may be omitted; `null` counts as omitted.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct CreateReportPayload {
    /// Defaults to the server's current date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tasks: Option<String>,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub plans: Option<String>,
    /// A number or a numeric string. Defaults to 8.
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub hours: Option<HoursInput>,
}

/// Clients send hours either as a JSON number or as text.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum HoursInput {
    Number(i32),
    /// Fractional or out-of-range numbers; truncated toward zero.
    Float(f64),
    Text(String),
}

impl HoursInput {
    fn into_hours(self) -> Result<i32, ApiError> {
        match self {
            HoursInput::Number(hours) => Ok(hours),
            HoursInput::Float(hours) => truncate_hours(hours),
            HoursInput::Text(text) => Ok(text.trim().parse::<i32>()?),
        }
    }
}

fn truncate_hours(hours: f64) -> Result<i32, ApiError> {
    let whole = hours.trunc();
    if whole.is_finite() && whole >= f64::from(i32::MIN) && whole <= f64::from(i32::MAX) {
        Ok(whole as i32)
    } else {
        Err(ApiError::InvalidHours(hours))
    }
}

impl CreateReportPayload {
    /// Parses a raw request body. A missing body is an empty object.
    pub fn from_body(body: Option<&str>) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(body.unwrap_or("{}"))?)
    }

    pub fn into_draft(self) -> Result<ReportDraft, ApiError> {
        Ok(ReportDraft {
            date: self.date,
            title: self.title,
            tasks: self.tasks,
            achievements: self.achievements,
            plans: self.plans,
            hours: self.hours.map(HoursInput::into_hours).transpose()?,
        })
    }
}

//=========================================================================================
// Bodies Sent FROM the Server TO the Client
//=========================================================================================

/// A persisted report as clients see it.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ReportBody {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub tasks: String,
    pub achievements: String,
    pub plans: String,
    pub hours: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportBody {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            date: report.date,
            title: report.title,
            tasks: report.tasks,
            achievements: report.achievements,
            plans: report.plans,
            hours: report.hours,
            created_at: report.created_at,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportBody>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CreatedReportResponse {
    pub report: ReportBody,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StatsResponse {
    pub total_reports: i64,
    pub avg_hours: f64,
    pub total_hours: i64,
    pub week_reports: i64,
}

impl From<ReportStats> for StatsResponse {
    fn from(stats: ReportStats) -> Self {
        Self {
            total_reports: stats.total_reports,
            avg_hours: stats.avg_hours,
            total_hours: stats.total_hours,
            week_reports: stats.week_reports,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
