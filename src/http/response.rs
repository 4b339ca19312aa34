//! Response handling.
//!
//! # Responsibilities
//! - Commit `200 OK` only once the upstream body has produced its first chunk
//! - Stream the upstream body to the caller without buffering it
//! - Log body failures and early caller disconnects
//!
//! Upstream status and headers are not copied. A body failure before the
//! first byte becomes a `500`; after that the status is already out, so a
//! failure can only truncate the body.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{future, stream, Stream, StreamExt};

use crate::error::{ForwardError, ForwardResult};

/// Build the success response around an upstream body.
///
/// Waits for the first chunk so an immediate body failure can still be
/// reported as an error. `head_only` skips the body entirely.
pub async fn forward_body<S, E>(
    mut upstream: S,
    request_id: String,
    head_only: bool,
) -> ForwardResult<Response>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    if head_only {
        return Ok((StatusCode::OK, Body::empty()).into_response());
    }

    let first = match upstream.next().await {
        Some(Ok(chunk)) => chunk,
        Some(Err(e)) => return Err(ForwardError::ResponseWrite(Box::new(e))),
        None => return Ok((StatusCode::OK, Body::empty()).into_response()),
    };

    let rest = stream::once(future::ready(Ok(first))).chain(upstream);
    let relay = RelayStream::new(rest, request_id);
    Ok((StatusCode::OK, Body::from_stream(relay)).into_response())
}

/// Passes upstream chunks through unchanged while tracking progress.
///
/// If the stream is dropped before the upstream finished, the caller went
/// away; dropping `inner` releases the upstream connection.
pub struct RelayStream<S> {
    inner: S,
    request_id: String,
    forwarded_bytes: u64,
    finished: bool,
}

impl<S> RelayStream<S> {
    pub fn new(inner: S, request_id: String) -> Self {
        Self {
            inner,
            request_id,
            forwarded_bytes: 0,
            finished: false,
        }
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = Result<Bytes, ForwardError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.as_mut().get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.forwarded_bytes += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                let err = ForwardError::ResponseWrite(Box::new(e));
                tracing::error!(
                    request_id = %this.request_id,
                    forwarded_bytes = this.forwarded_bytes,
                    error = %err,
                    "Error writing response"
                );
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                request_id = %self.request_id,
                forwarded_bytes = self.forwarded_bytes,
                "Caller disconnected before the upstream body was fully forwarded"
            );
        }
    }
}
