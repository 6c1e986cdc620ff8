//! services/api/src/web/handler.rs
//!
//! The report request handler: one envelope in, one envelope out.
//!
//! Every request is independent. A storage connection is acquired once the
//! route needs one and is dropped, and so released, on every exit path.

use crate::error::ApiError;
use crate::web::dispatch::{QueryRoute, Route};
use crate::web::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::web::protocol::{
    CreateReportPayload, CreatedReportResponse, MessageResponse, ReportListResponse, StatsResponse,
};
use axum::http::StatusCode;
use chrono::Local;
use daily_report_core::domain::{NewReport, Pagination, ReportId};
use daily_report_core::ports::{ReportConnection, ReportStore};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Dispatches report requests against a [`ReportStore`].
#[derive(Clone)]
pub struct ReportHandler {
    store: Arc<dyn ReportStore>,
}

impl ReportHandler {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Handles one request. Never fails: errors become `{"error": ...}` responses.
    pub async fn handle(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let span = info_span!(
            "report_request",
            request_id = %Uuid::new_v4(),
            method = %request.http_method,
            user_id = %request.user_id(),
        );

        async move {
            let route = Route::resolve(&request.http_method, request.query("action"));
            let result = match route {
                Route::Preflight => Ok(ResponseEnvelope::preflight()),
                Route::Query(route) => self.run(route, &request).await,
            };

            match result {
                Ok(response) => {
                    info!(status = response.status_code, "Request handled");
                    response
                }
                Err(e) => {
                    let response = ResponseEnvelope::from_error(&e);
                    if e.status_code().is_server_error() {
                        error!(status = response.status_code, "Request failed: {:?}", e);
                    } else {
                        warn!(status = response.status_code, "Request rejected: {}", e);
                    }
                    response
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        route: QueryRoute,
        request: &RequestEnvelope,
    ) -> Result<ResponseEnvelope, ApiError> {
        // The connection comes before method checks, so an unreachable database
        // reports a 500 even for an unsupported method.
        let mut conn = self.store.connect().await?;
        let user_id = request.user_id();

        match route {
            QueryRoute::Stats => stats(conn.as_mut(), user_id).await,
            QueryRoute::List => list(conn.as_mut(), user_id, request).await,
            QueryRoute::Create => create(conn.as_mut(), user_id, request).await,
            QueryRoute::Delete => delete(conn.as_mut(), user_id, request).await,
            QueryRoute::Unsupported => Err(ApiError::MethodNotAllowed),
        }
    }
}

//=========================================================================================
// Route Implementations
//=========================================================================================

async fn stats(conn: &mut dyn ReportConnection, user_id: &str) -> Result<ResponseEnvelope, ApiError> {
    let stats = conn.report_stats(user_id).await?;
    ResponseEnvelope::json(StatusCode::OK, &StatsResponse::from(stats))
}

async fn list(
    conn: &mut dyn ReportConnection,
    user_id: &str,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, ApiError> {
    let defaults = Pagination::default();
    let page = Pagination {
        limit: int_param(request, "limit")?.unwrap_or(defaults.limit),
        offset: int_param(request, "offset")?.unwrap_or(defaults.offset),
    };

    let reports = conn.list_reports(user_id, page).await?;
    let body = ReportListResponse {
        reports: reports.into_iter().map(Into::into).collect(),
    };
    ResponseEnvelope::json(StatusCode::OK, &body)
}

async fn create(
    conn: &mut dyn ReportConnection,
    user_id: &str,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, ApiError> {
    let draft = CreateReportPayload::from_body(request.body.as_deref())?.into_draft()?;
    let new_report = NewReport::from_draft(draft, Local::now().date_naive())?;

    let report = conn.create_report(user_id, new_report).await?;
    info!(report_id = report.id, "Report created");

    let body = CreatedReportResponse {
        report: report.into(),
    };
    ResponseEnvelope::json(StatusCode::CREATED, &body)
}

async fn delete(
    conn: &mut dyn ReportConnection,
    user_id: &str,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, ApiError> {
    let id: ReportId = match request.query("id").filter(|id| !id.is_empty()) {
        Some(raw) => raw.trim().parse()?,
        None => return Err(ApiError::Validation("Report ID is required".to_string())),
    };

    if !conn.delete_report(user_id, id).await? {
        return Err(ApiError::NotFound("Report not found".to_string()));
    }

    info!(report_id = id, "Report deleted");
    let body = MessageResponse {
        message: "Report deleted".to_string(),
    };
    ResponseEnvelope::json(StatusCode::OK, &body)
}

/// Parses an integer query parameter. Absent is `None`; malformed is an error.
fn int_param(request: &RequestEnvelope, name: &str) -> Result<Option<i64>, ApiError> {
    request
        .query(name)
        .map(|raw| raw.trim().parse::<i64>())
        .transpose()
        .map_err(ApiError::from)
}
