//! services/api/src/web/rest.rs
//!
//! Bridges plain HTTP onto the report handler's envelopes, builds the router,
//! and holds the master definition for the OpenAPI specification.

use crate::web::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::web::protocol::{
    CreateReportPayload, CreatedReportResponse, ErrorResponse, MessageResponse, ReportBody,
    ReportListResponse, StatsResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_reports_handler,
        create_report_handler,
        delete_report_handler,
        preflight_handler,
    ),
    components(
        schemas(
            CreateReportPayload,
            ReportBody,
            ReportListResponse,
            CreatedReportResponse,
            StatsResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Daily Report API", description = "Create, list, summarize and delete daily work reports.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds the HTTP router. `/reports` is the documented entry point; any other
/// path reaches the same handler, as a function URL would.
pub fn router(state: Arc<AppState>) -> Router {
    let reports = get(list_reports_handler)
        .post(create_report_handler)
        .delete(delete_report_handler)
        .options(preflight_handler)
        .fallback(forward_handler);

    Router::new()
        .route("/health", get(health_handler))
        .route("/reports", reports)
        .fallback(forward_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List reports, or summarize them with `action=stats`.
///
/// Without `action=stats` the response is `{"reports": [...]}`, newest first.
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Reports, or statistics when action=stats", body = ReportListResponse),
        (status = 500, description = "Storage failure or non-numeric pagination", body = ErrorResponse)
    ),
    params(
        ("X-User-Id" = Option<String>, Header, description = "Caller identity. Falls back to `default_user`."),
        ("action" = Option<String>, Query, description = "`stats` for aggregates, anything else lists."),
        ("limit" = Option<i64>, Query, description = "Maximum number of reports. Defaults to 50."),
        ("offset" = Option<i64>, Query, description = "Reports to skip. Defaults to 0.")
    )
)]
pub async fn list_reports_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    forward(&state, Method::GET, &headers, &uri, String::new()).await
}

/// Create a report for the calling user.
#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportPayload,
    responses(
        (status = 201, description = "Report created", body = CreatedReportResponse),
        (status = 400, description = "Title or tasks missing", body = ErrorResponse),
        (status = 500, description = "Malformed body or storage failure", body = ErrorResponse)
    ),
    params(
        ("X-User-Id" = Option<String>, Header, description = "Caller identity. Falls back to `default_user`.")
    )
)]
pub async fn create_report_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    body: String,
) -> Response {
    forward(&state, Method::POST, &headers, &uri, body).await
}

/// Delete one of the calling user's reports.
#[utoipa::path(
    delete,
    path = "/reports",
    responses(
        (status = 200, description = "Report deleted", body = MessageResponse),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 404, description = "No such report for this user", body = ErrorResponse),
        (status = 500, description = "Storage failure or non-numeric id", body = ErrorResponse)
    ),
    params(
        ("X-User-Id" = Option<String>, Header, description = "Caller identity. Falls back to `default_user`."),
        ("id" = i64, Query, description = "The report to delete.")
    )
)]
pub async fn delete_report_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    forward(&state, Method::DELETE, &headers, &uri, String::new()).await
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/reports",
    responses(
        (status = 200, description = "Allowed methods and headers, empty body")
    )
)]
pub async fn preflight_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    forward(&state, Method::OPTIONS, &HeaderMap::new(), &uri, String::new()).await
}

/// Catch-all for every other method or path.
pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
    body: String,
) -> Response {
    forward(&state, method, &headers, &uri, body).await
}

/// Liveness probe. Does not touch the database.
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

async fn forward(
    state: &AppState,
    method: Method,
    headers: &HeaderMap,
    uri: &Uri,
    body: String,
) -> Response {
    let params = match Query::<HashMap<String, String>>::try_from_uri(uri) {
        Ok(Query(params)) => params,
        Err(rejection) => return rejection.into_response(),
    };
    let request = envelope_from_http(&method, headers, params, body);
    state.handler.handle(request).await.into_response()
}

//=========================================================================================
// Envelope Conversion
//=========================================================================================

/// Builds a request envelope from decoded HTTP parts.
///
/// Header names are canonicalized so that `x-user-id` is found as `X-User-Id`.
/// An empty query map becomes `None` and an empty body becomes `None`.
pub fn envelope_from_http(
    method: &Method,
    headers: &HeaderMap,
    params: HashMap<String, String>,
    body: String,
) -> RequestEnvelope {
    let mut envelope = RequestEnvelope::new(method.as_str());

    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => {
                envelope
                    .headers
                    .entry(canonical_header_name(name.as_str()))
                    .or_insert_with(|| value.to_string());
            }
            Err(_) => warn!(header = %name, "Skipping header with non-ASCII value"),
        }
    }

    envelope.query_string_parameters = (!params.is_empty()).then_some(params);
    envelope.body = (!body.is_empty()).then_some(body);
    envelope
}

/// `x-user-id` -> `X-User-Id`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping response header that is not valid HTTP"),
            }
        }

        (status, headers, self.body).into_response()
    }
}
