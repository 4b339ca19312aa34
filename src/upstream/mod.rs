//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! keyword, portal
//!     → template.rs (percent-encode, substitute, parse URL)
//!     → client.rs (single GET, no retries)
//!     → reqwest::Response handed back to the HTTP layer for streaming
//! ```

pub mod client;
pub mod template;

pub use client::UpstreamClient;
pub use template::{encode_query_value, TemplateError, UpstreamTemplate, DEFAULT_UPSTREAM_TEMPLATE};
