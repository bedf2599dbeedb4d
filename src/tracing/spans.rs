//! Span creation helpers for blockwatt operations.
//!
//! Telemetry concerns are kept apart from business logic: instead of
//! `#[instrument]` attributes on the operations themselves, each instrumented
//! operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use tracing::{Level, Span};

/// Create span for a single explorer HTTP attempt.
///
/// Parent: whichever data-access span issued the request
/// Children: None
#[inline]
pub(crate) fn explorer_request(path: &str, group: &str) -> Span {
    tracing::debug_span!(
        "blockwatt.explorer_request",
        path = path,
        group = group,
        duration_ms = tracing::field::Empty,
    )
}

/// Create span for fetching one block summary.
///
/// Parent: day_consumption or block_energy span
/// Children: explorer_request span on cache miss
#[inline]
pub(crate) fn fetch_block(hash: &str) -> Span {
    tracing::debug_span!("blockwatt.fetch_block", hash = hash, cached = tracing::field::Empty)
}

/// Create span for fetching one transaction summary.
#[inline]
pub(crate) fn fetch_transaction(hash: &str) -> Span {
    tracing::debug_span!(
        "blockwatt.fetch_transaction",
        hash = hash,
        cached = tracing::field::Empty,
    )
}

/// Create span for listing the block hashes of a day.
///
/// Parent: consumption_per_day span
/// Children: explorer_request span
#[inline]
pub(crate) fn fetch_block_hashes_for_day(day_timestamp_ms: i64) -> Span {
    tracing::debug_span!(
        "blockwatt.fetch_block_hashes_for_day",
        day_timestamp_ms = day_timestamp_ms,
    )
}

/// Create span for fetching one page of wallet transactions.
#[inline]
pub(crate) fn fetch_wallet_page(address: &str, offset: u64) -> Span {
    tracing::debug_span!(
        "blockwatt.fetch_wallet_page",
        address = address,
        offset = offset,
        cached = tracing::field::Empty,
    )
}

/// Create span for the per-day consumption pipeline.
///
/// This is the main public API entry point for aggregation.
///
/// Parent: None (root span for this operation)
/// Children: fetch_block_hashes_for_day and day_consumption spans
#[inline]
pub(crate) fn consumption_per_day(num_days_back: u64) -> Span {
    tracing::span!(
        Level::INFO,
        "blockwatt.consumption_per_day",
        num_days_back = num_days_back,
    )
}

/// Create span for summing the blocks of one day.
///
/// Parent: consumption_per_day span
/// Children: fetch_block spans (one per hash)
#[inline]
pub(crate) fn day_consumption(day_timestamp_ms: i64, block_count: usize) -> Span {
    tracing::debug_span!(
        "blockwatt.day_consumption",
        day_timestamp_ms = day_timestamp_ms,
        block_count = block_count,
        failed_blocks = tracing::field::Empty,
    )
}

/// Create span for a block energy report.
#[inline]
pub(crate) fn block_energy(hash: &str) -> Span {
    tracing::span!(Level::INFO, "blockwatt.block_energy", hash = hash)
}

/// Create span for a transaction energy report.
#[inline]
pub(crate) fn transaction_energy(hash: &str) -> Span {
    tracing::span!(Level::INFO, "blockwatt.transaction_energy", hash = hash)
}

/// Create span for a wallet energy report.
///
/// Parent: None (root span for this operation)
/// Children: fetch_wallet_page spans (one per page)
#[inline]
pub(crate) fn wallet_energy(address: &str) -> Span {
    tracing::span!(
        Level::INFO,
        "blockwatt.wallet_energy",
        address = address,
        pages = tracing::field::Empty,
    )
}
