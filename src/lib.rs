//! Research Catalogue search proxy library.
//!
//! Accepts `/proxy?keyword=..&portal=..`, renders the fixed Research
//! Catalogue search URL and streams the upstream body back to the caller.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::ForwardError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
