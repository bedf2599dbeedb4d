// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Rate-limited, retrying HTTP transport for the block explorer.
//!
//! The transport is a stack of Tower middleware layers over a reqwest-backed
//! [`HttpService`]:
//!
//! ```text
//! RetryLayer -> RateLimitLayer -> LoggingLayer -> HttpService
//! ```
//!
//! Retry sits outermost so that every attempt goes back through admission:
//! a retried request queues behind requests that arrived while it was
//! failing and is paced like any other.
//!
//! # Rate Limiting
//!
//! Requests are bucketed into [`EndpointGroup`]s by their first path segment
//! (`rawblock`, `rawtx`, `blocks`, `rawaddr`). Each group is served in FIFO
//! order with a minimum interval between dispatches; groups are independent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockwatt::{ExplorerConfig, transport::{ExplorerHttpClient, ExplorerTransport}};
//!
//! let client = ExplorerHttpClient::new(&ExplorerConfig::default())?;
//! let response = client.request("rawblock/0000...?format=json").await?;
//! println!("{}", response.body["size"]);
//! ```
//!
//! ## With Group-Specific Configuration
//!
//! ```rust,ignore
//! use blockwatt::ExplorerConfigBuilder;
//! use std::time::Duration;
//!
//! // Wallet lookups are far more strictly limited upstream
//! let config = ExplorerConfigBuilder::new()
//!     .group_interval("rawaddr", Duration::from_secs(10))
//!     .build();
//! ```

mod endpoint;
mod http;
mod logging;
mod rate_limit;
mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tower::{ServiceBuilder, ServiceExt};

use crate::config::ExplorerConfig;
use crate::errors::TransportError;

pub use endpoint::EndpointGroup;
pub use http::HttpService;
pub use logging::{LoggingLayer, LoggingService};
pub use rate_limit::{RateLimitLayer, RateLimitService};
pub use retry::{RetryConfig, RetryLayer, RetryLayerBuilder, RetryService};

/// One request travelling through the transport stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerRequest {
    path: String,
    group: EndpointGroup,
}

impl ExplorerRequest {
    /// Creates a request for a path relative to the base URL, or an
    /// absolute URL.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let group = EndpointGroup::from_path(&path);
        Self { path, group }
    }

    /// The path or URL as given by the caller
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The rate-limiting bucket this request belongs to
    pub fn group(&self) -> &EndpointGroup {
        &self.group
    }
}

/// A successful (2xx) explorer response with its decoded JSON body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Decoded JSON body
    pub body: serde_json::Value,
    /// Response headers
    pub headers: HeaderMap,
    /// HTTP status code
    pub status: u16,
}

/// Anything that can answer explorer requests.
///
/// The data-access layer only depends on this trait, so tests can swap in a
/// scripted transport.
#[async_trait]
pub trait ExplorerTransport: Send + Sync {
    /// Performs a GET for `path` and returns the decoded response.
    ///
    /// Implementations apply pacing and retries; callers see only the final
    /// outcome.
    async fn request(&self, path: &str) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: ExplorerTransport + ?Sized> ExplorerTransport for Arc<T> {
    async fn request(&self, path: &str) -> Result<HttpResponse, TransportError> {
        (**self).request(path).await
    }
}

/// The full middleware stack over an inner service `S`.
pub type TransportStack<S> = RetryService<RateLimitService<LoggingService<S>>>;

/// Explorer client: the middleware stack over an HTTP service.
///
/// Cloning is cheap and clones share rate-limit state.
#[derive(Clone, Debug)]
pub struct ExplorerHttpClient<S = HttpService> {
    service: TransportStack<S>,
}

impl ExplorerHttpClient<HttpService> {
    /// Builds the reqwest-backed client described by `config`.
    pub fn new(config: &ExplorerConfig) -> Result<Self, TransportError> {
        let http = HttpService::new(config.base_url.clone(), config.http_request_timeout)?;
        Ok(Self::with_service(http, config))
    }
}

impl<S> ExplorerHttpClient<S> {
    /// Wraps an arbitrary inner service with retry, rate limiting and
    /// logging.
    pub fn with_service(inner: S, config: &ExplorerConfig) -> Self {
        let service = ServiceBuilder::new()
            .layer(RetryLayer::with_config(config.retry_config()))
            .layer(RateLimitLayer::from_config(config))
            .layer(LoggingLayer::new())
            .service(inner);
        Self { service }
    }
}

#[async_trait]
impl<S> ExplorerTransport for ExplorerHttpClient<S>
where
    S: tower::Service<ExplorerRequest, Response = HttpResponse, Error = TransportError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send,
{
    async fn request(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.service
            .clone()
            .oneshot(ExplorerRequest::new(path))
            .await
    }
}
