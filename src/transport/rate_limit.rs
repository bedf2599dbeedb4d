// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based rate limiting layer for explorer requests.
//!
//! Requests are paced per [`EndpointGroup`]: within a group they are admitted
//! strictly in arrival order, and two admissions are never closer together
//! than the group's minimum interval. Different groups do not block each
//! other.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex as StdMutex},
    task::{Context, Poll},
    time::Duration,
};

use tokio::{sync::Mutex, time::Instant};
use tower::Layer;
use tracing::trace;

use super::{EndpointGroup, ExplorerRequest};
use crate::config::ExplorerConfig;

/// A Tower layer that enforces a minimum interval between requests of the
/// same endpoint group.
///
/// Each group owns a fair (FIFO) async mutex guarding the instant of its last
/// dispatch. A request waits for the mutex, sleeps until the interval since
/// the previous dispatch has elapsed, stamps the dispatch time and releases
/// the mutex before handing the request to the inner service. The next
/// request in the queue therefore measures its interval from this request's
/// dispatch start, not from its response.
///
/// # Example
///
/// ```rust,ignore
/// use blockwatt::transport::RateLimitLayer;
/// use std::time::Duration;
///
/// // One request per second per endpoint, wallet lookups every 10 seconds
/// let layer = RateLimitLayer::with_min_interval(Duration::from_secs(1))
///     .with_group_interval("rawaddr", Duration::from_secs(10));
///
/// let service = tower::ServiceBuilder::new().layer(layer).service(http);
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    state: Arc<RateLimitState>,
}

impl RateLimitLayer {
    /// Creates a rate limit layer with a minimum delay between requests of
    /// the same endpoint group.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockwatt::transport::RateLimitLayer;
    /// use std::time::Duration;
    ///
    /// // At least 1s between two `rawblock` requests (1 req/s per endpoint)
    /// let layer = RateLimitLayer::with_min_interval(Duration::from_secs(1));
    /// ```
    pub fn with_min_interval(interval: Duration) -> Self {
        Self {
            state: Arc::new(RateLimitState::new(interval, HashMap::new())),
        }
    }

    /// Creates a rate limit layer from requests per second.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockwatt::transport::RateLimitLayer;
    ///
    /// // 2 requests per second per endpoint group
    /// let layer = RateLimitLayer::per_second(2);
    /// ```
    pub fn per_second(requests: u32) -> Self {
        let requests = requests.max(1);
        Self::with_min_interval(Duration::from_secs(1) / requests)
    }

    /// Creates a rate limit layer with the intervals from the configuration.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        let overrides = config
            .group_overrides
            .iter()
            .map(|(group, interval)| (EndpointGroup::from_path(group), *interval))
            .collect();
        Self {
            state: Arc::new(RateLimitState::new(config.min_request_interval, overrides)),
        }
    }

    /// Overrides the minimum interval for one endpoint group.
    ///
    /// Must be called before the layer is applied; overrides added afterwards
    /// are not seen by already-built services.
    pub fn with_group_interval(self, group: &str, interval: Duration) -> Self {
        let mut overrides = self.state.overrides.clone();
        overrides.insert(EndpointGroup::from_path(group), interval);
        Self {
            state: Arc::new(RateLimitState::new(self.state.default_interval, overrides)),
        }
    }

    /// The effective minimum interval for a group.
    pub fn interval_for(&self, group: &EndpointGroup) -> Duration {
        self.state.interval_for(group)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            service,
            state: self.state.clone(),
        }
    }
}

/// Admission bookkeeping for one endpoint group.
#[derive(Debug, Default)]
struct GroupSlot {
    /// When the most recently admitted request was dispatched
    last_dispatch: Option<Instant>,
}

/// Shared state behind every clone of the layer and its services.
#[derive(Debug)]
struct RateLimitState {
    default_interval: Duration,
    overrides: HashMap<EndpointGroup, Duration>,
    /// One admission queue per group, created on first use
    groups: StdMutex<HashMap<EndpointGroup, Arc<Mutex<GroupSlot>>>>,
}

impl RateLimitState {
    fn new(default_interval: Duration, overrides: HashMap<EndpointGroup, Duration>) -> Self {
        Self {
            default_interval,
            overrides,
            groups: StdMutex::new(HashMap::new()),
        }
    }

    fn interval_for(&self, group: &EndpointGroup) -> Duration {
        self.overrides
            .get(group)
            .copied()
            .unwrap_or(self.default_interval)
    }

    fn slot(&self, group: &EndpointGroup) -> Arc<Mutex<GroupSlot>> {
        // A poisoned map only means another thread panicked mid-insert; the
        // map itself is still consistent.
        let mut groups = self
            .groups
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        groups.entry(group.clone()).or_default().clone()
    }

    /// Waits for this request's turn in its group and stamps the dispatch time.
    ///
    /// Dropping the returned future while it waits leaves the group untouched.
    async fn admit(&self, group: &EndpointGroup) {
        let interval = self.interval_for(group);
        let slot = self.slot(group);

        // tokio's Mutex is fair: waiters acquire it in the order they queued
        let mut slot = slot.lock().await;

        if let Some(last) = slot.last_dispatch {
            let ready_at = last + interval;
            if ready_at > Instant::now() {
                trace!(
                    group = %group,
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "Waiting for endpoint group slot"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        slot.last_dispatch = Some(Instant::now());
    }
}

/// A Tower service that paces requests per endpoint group.
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
    service: S,
    state: Arc<RateLimitState>,
}

impl<S> tower::Service<ExplorerRequest> for RateLimitService<S>
where
    S: tower::Service<ExplorerRequest> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ExplorerRequest) -> Self::Future {
        let state = self.state.clone();
        let mut service = self.service.clone();

        Box::pin(async move {
            state.admit(request.group()).await;
            service.call(request).await
        })
    }
}
