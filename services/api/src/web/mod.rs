pub mod dispatch;
pub mod envelope;
pub mod handler;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the pieces the binary needs to build the web server router.
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use handler::ReportHandler;
pub use rest::router;
