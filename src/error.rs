//! Forwarding errors.
//!
//! Every variant maps to a generic `500` for the caller. The underlying
//! cause is only ever written to the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::upstream::template::TemplateError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body sent to the caller whenever forwarding fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";

/// Errors raised while forwarding a request to the upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The rendered template is not a valid URL.
    #[error("Invalid upstream URL '{url}': {source}")]
    InvalidUpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The upstream could not be reached or returned a malformed response.
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(#[source] reqwest::Error),

    /// Reading the upstream body or writing it to the caller failed mid-stream.
    #[error("Response write failed: {0}")]
    ResponseWrite(#[source] BoxError),

    /// The configured template is missing a placeholder.
    #[error("Invalid upstream template: {0}")]
    Template(#[from] TemplateError),

    /// The outbound HTTP client could not be constructed.
    #[error("Failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type ForwardResult<T> = Result<T, ForwardError>;

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, FETCH_ERROR_MESSAGE).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_response_hides_detail() {
        let err = ForwardError::InvalidUpstreamUrl {
            url: "not a url".into(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        assert!(err.to_string().contains("not a url"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], FETCH_ERROR_MESSAGE.as_bytes());
    }
}
