//! services/api/src/web/dispatch.rs
//!
//! Turns the method and `action` strings of a request into a closed set of routes.

use axum::http::Method;

/// What a request asks the handler to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight. Answered without touching storage.
    Preflight,
    /// Anything else. Resolved against storage.
    Query(QueryRoute),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoute {
    List,
    Stats,
    Create,
    Delete,
    Unsupported,
}

impl Route {
    /// Method names are matched case-sensitively. `action` only matters for `GET`,
    /// where everything but `stats` lists.
    pub fn resolve(method: &str, action: Option<&str>) -> Self {
        let method = match Method::from_bytes(method.as_bytes()) {
            Ok(method) => method,
            Err(_) => return Route::Query(QueryRoute::Unsupported),
        };

        match method {
            Method::OPTIONS => Route::Preflight,
            Method::GET => match action {
                Some("stats") => Route::Query(QueryRoute::Stats),
                _ => Route::Query(QueryRoute::List),
            },
            Method::POST => Route::Query(QueryRoute::Create),
            Method::DELETE => Route::Query(QueryRoute::Delete),
            _ => Route::Query(QueryRoute::Unsupported),
        }
    }
}
