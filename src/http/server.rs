//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/proxy` handler
//! - Wire up middleware (request ID, tracing span)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::ForwardResult;
use crate::http::{handler::proxy_handler, PROXY_PATH, X_REQUEST_ID};
use crate::upstream::{UpstreamClient, UpstreamTemplate};

/// Application state injected into handlers.
///
/// Immutable after startup; requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub template: Arc<UpstreamTemplate>,
    pub client: UpstreamClient,
}

/// HTTP server for the search proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> ForwardResult<Self> {
        let template = Arc::new(UpstreamTemplate::new(&config.upstream.template)?);
        let client = UpstreamClient::new(&config.upstream, &config.timeouts)?;

        let state = AppState { template, client };
        let router = Self::build_router(state);

        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route(PROXY_PATH, any(proxy_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires (or its sender is dropped) and
    /// in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "Proxy server running on http://{}{}",
            addr,
            PROXY_PATH
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForwardError;

    #[test]
    fn test_new_rejects_bad_template() {
        let mut config = ProxyConfig::default();
        config.upstream.template = "http://example.com/?keyword={keyword}".into();

        assert!(matches!(HttpServer::new(config), Err(ForwardError::Template(_))));
    }

    #[test]
    fn test_new_keeps_config() {
        let server = HttpServer::new(ProxyConfig::default()).unwrap();
        assert_eq!(server.config().listener.bind_address, "0.0.0.0:3000");
    }
}
