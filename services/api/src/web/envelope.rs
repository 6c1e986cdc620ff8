//! services/api/src/web/envelope.rs
//!
//! The host-independent request and response envelopes the report handler
//! consumes and produces, plus the CORS headers every response carries.

use crate::error::ApiError;
use axum::http::StatusCode;
use daily_report_core::DEFAULT_USER_ID;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

/// Header that names the caller. Looked up with exact casing.
pub const USER_ID_HEADER: &str = "X-User-Id";

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, X-User-Id";

//=========================================================================================
// Request Envelope
//=========================================================================================

/// An HTTP-like request, detached from the transport it arrived on.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RequestEnvelope {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// The caller's identity, or [`DEFAULT_USER_ID`] when the header is absent.
    pub fn user_id(&self) -> &str {
        self.header(USER_ID_HEADER).unwrap_or(DEFAULT_USER_ID)
    }
}

//=========================================================================================
// Response Envelope
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    /// A JSON response with the origin header attached.
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Result<Self, ApiError> {
        Ok(Self::json_text(status, serde_json::to_string(payload)?))
    }

    /// The answer to a CORS preflight: no body, full CORS header set.
    pub fn preflight() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());
        headers.insert(ALLOW_METHODS.to_string(), ALLOWED_METHODS.to_string());
        headers.insert(ALLOW_HEADERS.to_string(), ALLOWED_HEADERS.to_string());
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// Renders any error as `{"error": "<message>"}` with its mapped status.
    pub fn from_error(error: &ApiError) -> Self {
        let body = json!({ "error": error.to_string() }).to_string();
        Self::json_text(error.status_code(), body)
    }

    fn json_text(status: StatusCode, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());
        Self {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
