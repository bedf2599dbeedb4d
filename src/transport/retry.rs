// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based retry layer with exponential backoff for explorer requests.
//!
//! Transient failures (see [`TransportError::is_retryable`]) are retried up to
//! a fixed number of attempts. A 429 response with a `Retry-After` header
//! waits as long as the server asks; everything else backs off
//! exponentially.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tower::Layer;
use tracing::{debug, warn};

use super::{ExplorerRequest, HttpResponse};
use crate::config::constants::{HTTP_MAX_ATTEMPTS, HTTP_RETRY_BASE_DELAY_MS, HTTP_RETRY_MAX_DELAY_MS};
use crate::errors::TransportError;

/// A Tower layer that retries transient explorer failures.
///
/// The backoff formula is:
///
/// ```text
/// delay = min(base_delay * 2^retry, max_delay)
/// ```
///
/// so the defaults wait 1s, then 2s. For HTTP 429 a `Retry-After` header
/// replaces the formula: a number is read as seconds, anything else as an
/// HTTP date, and a date in the past means retrying immediately.
///
/// # Example
///
/// ```rust,ignore
/// use blockwatt::transport::RetryLayer;
/// use std::time::Duration;
///
/// let layer = RetryLayer::builder()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(200))
///     .build();
///
/// let service = tower::ServiceBuilder::new().layer(layer).service(http);
/// ```
#[derive(Clone, Debug)]
pub struct RetryLayer {
    config: Arc<RetryConfig>,
}

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, the initial request included.
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum backoff delay between attempts.
    ///
    /// Server-supplied `Retry-After` waits are not capped.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: HTTP_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(HTTP_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(HTTP_RETRY_MAX_DELAY_MS),
        }
    }
}

impl RetryLayer {
    /// Creates a new retry layer with default settings.
    ///
    /// Default settings:
    /// - 3 attempts in total
    /// - 1s base delay
    /// - 30s maximum delay
    pub fn new() -> Self {
        Self::with_config(RetryConfig::default())
    }

    /// Creates a retry layer from an explicit configuration.
    pub fn with_config(config: RetryConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a builder for customizing retry configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockwatt::transport::RetryLayer;
    /// use std::time::Duration;
    ///
    /// let layer = RetryLayer::builder()
    ///     .max_attempts(5)
    ///     .base_delay(Duration::from_millis(200))
    ///     .build();
    /// ```
    pub fn builder() -> RetryLayerBuilder {
        RetryLayerBuilder::new()
    }

    /// The configuration this layer applies.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for RetryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RetryService {
            service,
            config: self.config.clone(),
        }
    }
}

/// Builder for configuring a [`RetryLayer`].
#[derive(Clone, Debug, Default)]
pub struct RetryLayerBuilder {
    config: RetryConfig,
}

impl RetryLayerBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of attempts, the initial request included.
    ///
    /// Values below 1 are treated as 1.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the base delay for exponential backoff.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Sets the maximum backoff delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Builds the configured [`RetryLayer`].
    pub fn build(self) -> RetryLayer {
        RetryLayer::with_config(self.config)
    }
}

/// A Tower service that retries transient explorer failures.
#[derive(Clone, Debug)]
pub struct RetryService<S> {
    service: S,
    config: Arc<RetryConfig>,
}

impl<S> tower::Service<ExplorerRequest> for RetryService<S>
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
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let mut attempt = 1u32;
            loop {
                let mut service_clone = service.clone();

                match service_clone.call(request.clone()).await {
                    Ok(response) => {
                        if attempt > 1 {
                            debug!(attempt, path = request.path(), "Request succeeded after retry");
                        }
                        return Ok(response);
                    }
                    Err(error) => {
                        if !error.is_retryable() {
                            debug!(error = %error, "Non-retryable error, not retrying");
                            return Err(error);
                        }

                        if attempt >= config.max_attempts {
                            warn!(
                                error = %error,
                                attempts = attempt,
                                "Max retries exceeded"
                            );
                            return Err(error);
                        }

                        let delay = retry_delay(&error, attempt - 1, &config, Utc::now());
                        warn!(
                            error = %error,
                            attempt,
                            max_attempts = config.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            "Retryable error, backing off"
                        );

                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        })
    }
}

/// Delay before the next attempt after `error`.
///
/// `retry` is zero for the first retry.
fn retry_delay(
    error: &TransportError,
    retry: u32,
    config: &RetryConfig,
    now: DateTime<Utc>,
) -> Duration {
    error
        .retry_after()
        .and_then(|value| parse_retry_after(value, now))
        .unwrap_or_else(|| calculate_backoff(retry, config))
}

/// Calculates the backoff duration for a given retry.
///
/// Uses exponential backoff: `min(base_delay * 2^retry, max_delay)`
fn calculate_backoff(retry: u32, config: &RetryConfig) -> Duration {
    let multiplier = 2u64.saturating_pow(retry);
    let delay_ms = config
        .base_delay
        .as_millis()
        .saturating_mul(multiplier as u128);
    let capped_delay_ms = delay_ms.min(config.max_delay.as_millis()) as u64;
    Duration::from_millis(capped_delay_ms)
}

/// Parses a `Retry-After` header value.
///
/// Returns `None` for values that are neither delay-seconds nor an HTTP date,
/// in which case the caller falls back to exponential backoff. Dates in the
/// past yield a zero delay.
pub(crate) fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<u64>().ok().map(Duration::from_secs);
    }

    let target = DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()?
        .with_timezone(&Utc);

    Some((target - now).to_std().unwrap_or(Duration::ZERO))
}
