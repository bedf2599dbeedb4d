//! Error types for the blockwatt library.
//!
//! This module provides strongly-typed errors for all public APIs in blockwatt.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`ExplorerError`,
//!   `TransportError`, etc.)
//! - **Unified error type** (`BlockwattError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Architecture
//!
//! - [`TransportError`] - HTTP failures, after retries are exhausted
//! - [`CacheError`] - Failures to encode a cache entry
//! - [`ExplorerError`] - Validation and payload-shape errors from data access
//!   (wraps [`TransportError`])
//! - [`AggregationError`] - Date-range violations in per-day aggregation
//! - [`ConfigError`] - Invalid configuration values
//!
//! # Examples
//!
//! ```rust,ignore
//! use blockwatt::{BlockwattError, ExplorerContext, ExplorerConfig};
//!
//! async fn example() -> Result<(), BlockwattError> {
//!     let context = ExplorerContext::new(ExplorerConfig::from_env()?)?;
//!     let days = context.energy().consumption_per_day(2).await?;
//!     // Errors automatically convert to BlockwattError via From implementations
//!     Ok(())
//! }
//! ```

mod aggregation;
mod cache;
mod config;
mod explorer;
mod transport;

pub use aggregation::AggregationError;
pub use cache::CacheError;
pub use config::ConfigError;
pub use explorer::ExplorerError;
pub use transport::{TransportError, RETRYABLE_STATUS_CODES};

/// Unified error type for all blockwatt operations.
///
/// All module-specific error types automatically convert to `BlockwattError` via
/// `From` implementations, so you can use `?` to propagate errors naturally.
#[derive(Debug, thiserror::Error)]
pub enum BlockwattError {
    /// Error from the HTTP transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error from the object cache.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from blockchain data access.
    #[error("Explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Error from per-day aggregation.
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Error from configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
