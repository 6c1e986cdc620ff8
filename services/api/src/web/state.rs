//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::web::handler::ReportHandler;
use daily_report_core::ports::ReportStore;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: ReportHandler,
}

impl AppState {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            handler: ReportHandler::new(store),
        }
    }
}
