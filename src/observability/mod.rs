//! Observability subsystem.
//!
//! Structured logging only. Every log event on the request path carries
//! the `request_id` assigned by the HTTP layer.

pub mod logging;

pub use logging::init_logging;
