//! Outbound HTTP client.
//!
//! One GET per inbound request. No custom headers, no retries and, unless
//! configured, no timeout.

use std::time::Duration;

use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::{ForwardError, ForwardResult};

/// Thin wrapper over `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> ForwardResult<Self> {
        let mut builder = reqwest::Client::builder();

        if !upstream.system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let inner = builder.build().map_err(ForwardError::Client)?;
        Ok(Self { inner })
    }

    /// Send the GET and return once response headers arrive.
    ///
    /// The upstream status is not inspected; whatever body comes back is
    /// the caller's to forward.
    pub async fn fetch(&self, url: Url) -> ForwardResult<reqwest::Response> {
        self.inner
            .get(url)
            .send()
            .await
            .map_err(ForwardError::UpstreamFetch)
    }
}
