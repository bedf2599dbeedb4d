// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Energy estimates for Bitcoin blocks, transactions and wallets.
//!
//! Energy is modelled as `size_bytes * watt_per_byte`; the sizes come from a
//! public block-explorer API that rate-limits aggressively. The crate is
//! mostly the data-access layer that makes that workable:
//!
//! - [`transport`]: Tower stack with per-endpoint FIFO pacing, retries and
//!   `Retry-After` handling over reqwest
//! - [`cache`]: bounded TTL/LRU object cache in front of the transport
//! - [`explorer`]: validated, cache-through reads of blocks, transactions,
//!   day listings and wallet pages
//! - [`energy`]: block, transaction and wallet reports, plus the per-day
//!   pipeline that batches requests and degrades instead of failing
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blockwatt::{ExplorerConfig, ExplorerContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blockwatt::BlockwattError> {
//!     let context = ExplorerContext::new(ExplorerConfig::from_env()?)?;
//!
//!     let tx = context.energy().transaction_energy("b6f6991d...").await?;
//!     println!("{} W", tx.consumed_energy);
//!
//!     for (day, record) in context.energy().consumption_per_day(2).await? {
//!         println!("{day}: {} W (degraded: {})", record.consumed_energy_watts, record.is_degraded());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod days;
pub mod energy;
pub mod errors;
pub mod explorer;
pub(crate) mod tracing;
pub mod transport;

pub use cache::{Cache, CacheBackend, CacheStats, MemoryCache, NoOpCache};
pub use config::{ExplorerConfig, ExplorerConfigBuilder};
pub use context::ExplorerContext;
pub use energy::{BlockEnergy, DayEnergyRecord, EnergyCalculator, TransactionEnergy, WalletEnergy};
pub use errors::{
    AggregationError, BlockwattError, CacheError, ConfigError, ExplorerError, TransportError,
};
pub use explorer::{BlockSummary, BlockchainExplorer, TransactionSummary, WalletPage};
pub use transport::{
    EndpointGroup, ExplorerHttpClient, ExplorerTransport, HttpResponse, RateLimitLayer, RetryLayer,
};
