pub mod domain;
pub mod ports;

pub use domain::{
    NewReport, Pagination, Report, ReportDraft, ReportId, ReportStats, ValidationError,
    DEFAULT_HOURS, DEFAULT_USER_ID,
};
pub use ports::{PortError, PortResult, ReportConnection, ReportStore};
