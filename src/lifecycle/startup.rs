//! Startup orchestration.
//!
//! Fail fast: any startup error is fatal. The listener is bound last, so
//! traffic only arrives once config and server are ready.

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, validate_config, ConfigError, ProxyConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Built-in defaults, or the TOML file at `path`, with an optional bind
/// address override applied on top. The result is always validated.
pub fn resolve_config(
    path: Option<&Path>,
    bind_override: Option<String>,
) -> Result<ProxyConfig, StartupError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(bind_address) = bind_override {
        config.listener.bind_address = bind_address;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Bind the configured listen address.
pub async fn bind_listener(config: &ProxyConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(None, None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_bind_override_is_validated() {
        let config = resolve_config(None, Some("127.0.0.1:8123".into())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8123");

        let err = resolve_config(None, Some("nope".into())).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bind_listener_reports_address_in_use() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        let listener = bind_listener(&config).await.unwrap();
        let taken = listener.local_addr().unwrap().to_string();

        config.listener.bind_address = taken.clone();
        let err = bind_listener(&config).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
        assert!(err.to_string().contains(&taken));
    }
}
