//! Configuration validation.
//!
//! # Responsibilities
//! - Check the bind address parses as a socket address
//! - Check the upstream template has both placeholders exactly once
//! - Check the template renders to an absolute http(s) URL
//! - Reject zero timeouts
//!
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::upstream::template::UpstreamTemplate;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("upstream.template: {0}")]
    Template(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration. Pure function; does no I/O.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match UpstreamTemplate::new(&config.upstream.template) {
        Ok(template) => match template.build_url("", "") {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::Template(format!(
                "unsupported scheme '{}'",
                url.scheme()
            ))),
            Err(e) => errors.push(ValidationError::Template(e.to_string())),
        },
        Err(e) => errors.push(ValidationError::Template(e.to_string())),
    }

    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
