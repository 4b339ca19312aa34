//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace span)
//!     → handler.rs (extract keyword/portal, build URL, fetch)
//!     → response.rs (200 + streamed upstream body, or generic 500)
//!     → Send to client
//! ```

pub mod handler;
pub mod response;
pub mod server;

pub use handler::{proxy_handler, ProxyParams};
pub use server::{AppState, HttpServer};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The only route served.
pub const PROXY_PATH: &str = "/proxy";
