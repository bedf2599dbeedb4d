// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Explicitly constructed owner of the cache, transport and data access
//!
//! Nothing in the crate is a process-wide singleton. A caller builds one
//! [`ExplorerContext`] at startup and shares it (or clones of its parts); all
//! operations made through it share one cache and one set of rate limits.

use std::sync::Arc;

use crate::cache::Cache;
use crate::config::ExplorerConfig;
use crate::energy::EnergyCalculator;
use crate::errors::BlockwattError;
use crate::explorer::BlockchainExplorer;
use crate::transport::{ExplorerHttpClient, ExplorerTransport};

/// Cache, transport, data access and energy calculator wired together
///
/// # Examples
///
/// ```rust,ignore
/// use blockwatt::{ExplorerConfig, ExplorerContext};
///
/// let context = ExplorerContext::new(ExplorerConfig::from_env()?)?;
/// let days = context.energy().consumption_per_day(2).await?;
/// for (day, record) in days {
///     println!("{day}: {} W", record.consumed_energy_watts);
/// }
/// ```
#[derive(Debug)]
pub struct ExplorerContext<T = ExplorerHttpClient> {
    config: Arc<ExplorerConfig>,
    cache: Arc<Cache>,
    explorer: Arc<BlockchainExplorer<T>>,
    energy: EnergyCalculator<T>,
}

impl ExplorerContext<ExplorerHttpClient> {
    /// Builds a context talking HTTP to the configured explorer.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: ExplorerConfig) -> Result<Self, BlockwattError> {
        config.validate()?;
        let transport = ExplorerHttpClient::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: ExplorerTransport> ExplorerContext<T> {
    /// Builds a context over any transport, with a fresh in-memory cache
    pub fn with_transport(transport: T, config: ExplorerConfig) -> Self {
        let cache = Arc::new(Cache::from_config(&config));
        Self::with_parts(transport, cache, config)
    }

    /// Builds a context over any transport and an existing cache
    pub fn with_parts(transport: T, cache: Arc<Cache>, config: ExplorerConfig) -> Self {
        let explorer = Arc::new(BlockchainExplorer::new(transport, cache.clone(), &config));
        let energy = EnergyCalculator::new(explorer.clone(), &config);
        Self {
            config: Arc::new(config),
            cache,
            explorer,
            energy,
        }
    }

    /// The configuration this context was built with
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The shared object cache
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Blockchain data access
    pub fn explorer(&self) -> &Arc<BlockchainExplorer<T>> {
        &self.explorer
    }

    /// Energy calculator over this context's data access
    pub fn energy(&self) -> &EnergyCalculator<T> {
        &self.energy
    }
}
