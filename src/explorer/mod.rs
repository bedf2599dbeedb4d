// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Domain-typed access to the block explorer
//!
//! [`BlockchainExplorer`] reads blocks, transactions, day listings and wallet
//! pages. Every read except the day listing goes through the [`Cache`]
//! first; upstream payloads are validated and normalized into the types in
//! [`types`] before they are cached or returned.
//!
//! # Examples
//!
//! ```rust,ignore
//! use blockwatt::{BlockchainExplorer, Cache, ExplorerConfig, ExplorerHttpClient};
//! use std::sync::Arc;
//!
//! let config = ExplorerConfig::default();
//! let explorer = BlockchainExplorer::new(
//!     ExplorerHttpClient::new(&config)?,
//!     Arc::new(Cache::from_config(&config)),
//!     &config,
//! );
//!
//! let block = explorer.fetch_block("00000000000000000002...").await?;
//! println!("{} bytes, {} transactions", block.size_bytes, block.transactions.len());
//! ```

mod payload;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn, Instrument, Span};
use url::Url;

use crate::cache::Cache;
use crate::config::ExplorerConfig;
use crate::days::is_same_utc_day;
use crate::errors::{ExplorerError, TransportError};
use crate::tracing::spans;
use crate::transport::ExplorerTransport;

pub use types::{BlockSummary, TransactionSummary, WalletPage};

/// Cache key of one wallet page
pub fn wallet_cache_key(address: &str, offset: u64) -> String {
    format!("wallet:{address}:{offset}")
}

/// Hashes and addresses end up as a single path segment, so only ASCII
/// alphanumerics are accepted.
fn require_identifier(name: &'static str, value: &str) -> Result<(), ExplorerError> {
    if value.trim().is_empty() {
        return Err(ExplorerError::invalid_argument(name, "must not be empty"));
    }
    if let Some(c) = value.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(ExplorerError::invalid_argument(
            name,
            format!("unexpected character {c:?} in {value:?}"),
        ));
    }
    Ok(())
}

/// Cache-through reader for explorer data
pub struct BlockchainExplorer<T> {
    transport: T,
    cache: Arc<Cache>,
    day_listing_url: Url,
    wallet_cache_ttl: Duration,
}

impl<T: ExplorerTransport> BlockchainExplorer<T> {
    /// Creates an explorer reading through `cache` and fetching via
    /// `transport`.
    pub fn new(transport: T, cache: Arc<Cache>, config: &ExplorerConfig) -> Self {
        Self {
            transport,
            cache,
            day_listing_url: config.day_listing_url.clone(),
            wallet_cache_ttl: config.wallet_cache_ttl,
        }
    }

    /// The cache this explorer reads through
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// The transport this explorer fetches with
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches a block by hash.
    ///
    /// Blocks mined on the current UTC day are returned but not cached; their
    /// contents may still change.
    pub async fn fetch_block(&self, hash: &str) -> Result<BlockSummary, ExplorerError> {
        require_identifier("block hash", hash)?;

        async move {
            if let Some(block) = self.cache.get::<BlockSummary>(hash).await {
                Span::current().record("cached", true);
                return Ok(block);
            }
            Span::current().record("cached", false);

            let path = format!("rawblock/{hash}?format=json");
            let response = self.transport.request(&path).await?;
            let block = payload::parse_block(&path, response.body)?;

            if is_same_utc_day(block.unix_time, Utc::now()) {
                info!(hash, "Skipping cache for block mined today");
            } else if let Err(e) = self.cache.set(hash, &block, None).await {
                warn!(hash, error = %e, "Failed to cache block");
            }

            debug!(
                hash,
                size_bytes = block.size_bytes,
                transactions = block.transactions.len(),
                "Fetched block"
            );
            Ok::<_, ExplorerError>(block)
        }
        .instrument(spans::fetch_block(hash))
        .await
    }

    /// Fetches a transaction by hash. Transactions are always cached.
    pub async fn fetch_transaction(&self, hash: &str) -> Result<TransactionSummary, ExplorerError> {
        require_identifier("transaction hash", hash)?;

        async move {
            if let Some(tx) = self.cache.get::<TransactionSummary>(hash).await {
                Span::current().record("cached", true);
                return Ok(tx);
            }
            Span::current().record("cached", false);

            let path = format!("rawtx/{hash}?format=json");
            let response = self.transport.request(&path).await?;
            let tx = payload::parse_transaction(&path, response.body)?;

            if let Err(e) = self.cache.set(hash, &tx, None).await {
                warn!(hash, error = %e, "Failed to cache transaction");
            }

            debug!(hash, size_bytes = tx.size_bytes, "Fetched transaction");
            Ok::<_, ExplorerError>(tx)
        }
        .instrument(spans::fetch_transaction(hash))
        .await
    }

    /// Lists the hashes of the blocks mined on the UTC day starting at
    /// `day_timestamp_ms`.
    ///
    /// The listing lives on the day-listing host, which may differ from the
    /// base URL. It is never cached.
    pub async fn fetch_block_hashes_for_day(
        &self,
        day_timestamp_ms: i64,
    ) -> Result<Vec<String>, ExplorerError> {
        if day_timestamp_ms < 0 {
            return Err(ExplorerError::invalid_argument(
                "day timestamp",
                format!("must be non-negative, got {day_timestamp_ms}"),
            ));
        }

        async move {
            let relative = format!("blocks/{day_timestamp_ms}?format=json");
            let url = self
                .day_listing_url
                .join(&relative)
                .map_err(|e| TransportError::InvalidUrl {
                    path: relative.clone(),
                    details: e.to_string(),
                })?;

            let response = self.transport.request(url.as_str()).await?;
            let hashes = payload::parse_block_hashes(url.as_str(), response.body)?;

            info!(day_timestamp_ms, blocks = hashes.len(), "Fetched block hashes for day");
            Ok::<_, ExplorerError>(hashes)
        }
        .instrument(spans::fetch_block_hashes_for_day(day_timestamp_ms))
        .await
    }

    /// Fetches one page of a wallet's transactions starting at `offset`.
    ///
    /// Non-empty pages are cached for the wallet TTL; empty pages are not
    /// cached at all.
    pub async fn fetch_wallet_page(
        &self,
        address: &str,
        offset: u64,
    ) -> Result<WalletPage, ExplorerError> {
        require_identifier("wallet address", address)?;

        async move {
            let key = wallet_cache_key(address, offset);
            if let Some(page) = self.cache.get::<WalletPage>(&key).await {
                Span::current().record("cached", true);
                return Ok(page);
            }
            Span::current().record("cached", false);

            let path = format!("rawaddr/{address}?offset={offset}");
            let response = self.transport.request(&path).await?;
            let page = payload::parse_wallet_page(&path, response.body, offset)?;

            if page.is_empty() {
                debug!(address, offset, "Not caching empty wallet page");
            } else if let Err(e) = self.cache.set(&key, &page, Some(self.wallet_cache_ttl)).await {
                warn!(key = %key, error = %e, "Failed to cache wallet page");
            }

            debug!(
                address,
                offset,
                total = page.total_transaction_count,
                transactions = page.transactions.len(),
                "Fetched wallet page"
            );
            Ok::<_, ExplorerError>(page)
        }
        .instrument(spans::fetch_wallet_page(address, offset))
        .await
    }
}

impl<T> std::fmt::Debug for BlockchainExplorer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainExplorer")
            .field("cache", &self.cache)
            .field("day_listing_url", &self.day_listing_url.as_str())
            .field("wallet_cache_ttl", &self.wallet_cache_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_cache_key() {
        assert_eq!(wallet_cache_key("1abc", 50), "wallet:1abc:50");
    }

    #[test]
    fn test_require_identifier() {
        assert!(require_identifier("block hash", "abc").is_ok());
        assert!(matches!(
            require_identifier("block hash", "  "),
            Err(ExplorerError::InvalidArgument { name: "block hash", .. })
        ));
    }

    #[test]
    fn test_require_identifier_rejects_path_syntax() {
        assert!(require_identifier("wallet address", "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq").is_ok());
        for value in ["x/../rawaddr/y", "a?b", "a#b", "a%2Fb", " abc", "abc\n"] {
            assert!(
                matches!(
                    require_identifier("wallet address", value),
                    Err(ExplorerError::InvalidArgument { name: "wallet address", .. })
                ),
                "{value:?} should be rejected"
            );
        }
    }
}
