// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for explorer requests.
//!
//! Sits closest to the HTTP service, so every attempt the retry layer makes
//! shows up as its own `explorer_request` span.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::time::Instant;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

use super::{ExplorerRequest, HttpResponse};
use crate::errors::TransportError;
use crate::tracing::spans;

/// A Tower layer that records timing and outcome of explorer requests.
///
/// # Example
///
/// ```rust,ignore
/// use blockwatt::transport::LoggingLayer;
///
/// let service = tower::ServiceBuilder::new()
///     .layer(LoggingLayer::new().with_response_logging())
///     .service(http);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    /// Whether to log the full request path and group
    log_requests: bool,
    /// Whether to log response bodies (can be very large for blocks)
    log_responses: bool,
}

impl LoggingLayer {
    /// Creates a new logging layer with default settings.
    ///
    /// By default, only timing and errors are logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables trace-level logging of each request.
    pub fn with_request_logging(mut self) -> Self {
        self.log_requests = true;
        self
    }

    /// Enables trace-level logging of response bodies.
    ///
    /// Warning: a `rawblock` body holds every transaction of the block.
    pub fn with_response_logging(mut self) -> Self {
        self.log_responses = true;
        self
    }

    /// Enables logging of both requests and responses.
    pub fn verbose(mut self) -> Self {
        self.log_requests = true;
        self.log_responses = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            log_requests: self.log_requests,
            log_responses: self.log_responses,
        }
    }
}

/// A Tower service that logs explorer requests and responses.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    log_requests: bool,
    log_responses: bool,
}

impl<S> tower::Service<ExplorerRequest> for LoggingService<S>
where
    S: tower::Service<ExplorerRequest, Response = HttpResponse, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = HttpResponse;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ExplorerRequest) -> Self::Future {
        let log_requests = self.log_requests;
        let log_responses = self.log_responses;
        let mut service = self.service.clone();
        let span = spans::explorer_request(request.path(), request.group().as_str());

        Box::pin(
            async move {
                let start = Instant::now();

                if log_requests {
                    trace!(request = ?request, "Explorer request");
                } else {
                    debug!("Explorer request: {}", request.path());
                }

                let result = service.call(request).await;
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);

                match &result {
                    Ok(response) if log_responses => {
                        trace!(
                            status = response.status,
                            body = %response.body,
                            duration_ms,
                            "Explorer response"
                        );
                    }
                    Ok(response) => {
                        debug!(status = response.status, duration_ms, "Explorer response");
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            retryable = e.is_retryable(),
                            duration_ms,
                            "Explorer request failed"
                        );
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
