//! The `/proxy` handler.
//!
//! Extracts `keyword` and `portal`, renders the upstream URL, performs a
//! single GET and streams the body back.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::error::{ForwardError, ForwardResult};
use crate::http::response::forward_body;
use crate::http::server::AppState;
use crate::http::X_REQUEST_ID;

/// Query parameters of an inbound request.
///
/// Values are the decoded bytes exactly as sent; no character set is
/// assumed. A missing parameter is empty. When a key repeats the first
/// value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyParams {
    pub keyword: Vec<u8>,
    pub portal: Vec<u8>,
}

impl ProxyParams {
    /// Extract parameters from a raw query string. Never fails.
    ///
    /// `+` decodes to a space; malformed escapes such as `%ZZ` are kept
    /// literally.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut keyword = None;
        let mut portal = None;

        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match decode_component(key).as_slice() {
                b"keyword" if keyword.is_none() => keyword = Some(decode_component(value)),
                b"portal" if portal.is_none() => portal = Some(decode_component(value)),
                _ => {}
            }
        }

        Self {
            keyword: keyword.unwrap_or_default(),
            portal: portal.unwrap_or_default(),
        }
    }
}

fn decode_component(raw: &str) -> Vec<u8> {
    percent_decode_str(&raw.replace('+', " ")).collect()
}

/// Forward one request upstream. Accepts any method.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let params = ProxyParams::from_query(query.as_deref());

    let result = match fetch_upstream(&state, &params).await {
        Ok(upstream) => {
            let head_only = method == Method::HEAD;
            forward_body(Box::pin(upstream.bytes_stream()), request_id.clone(), head_only).await
        }
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        let message = match e {
            ForwardError::ResponseWrite(_) => "Error writing response",
            _ => "Error fetching data",
        };
        tracing::error!(
            request_id = %request_id,
            keyword = %String::from_utf8_lossy(&params.keyword),
            portal = %String::from_utf8_lossy(&params.portal),
            error = %e,
            "{}",
            message
        );
        e.into_response()
    })
}

async fn fetch_upstream(state: &AppState, params: &ProxyParams) -> ForwardResult<reqwest::Response> {
    let url = state.template.build_url(&params.keyword, &params.portal)?;
    tracing::debug!(url = %url, "Forwarding to upstream");
    state.client.fetch(url).await
}
