// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Energy calculator for blocks, transactions and wallets
//!
//! [`EnergyCalculator`] turns explorer data into energy figures by
//! multiplying byte sizes by a fixed watts-per-byte factor. The per-day
//! pipeline lives in [`super::daily`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use blockwatt::{ExplorerConfig, ExplorerContext};
//!
//! let context = ExplorerContext::new(ExplorerConfig::from_env()?)?;
//! let energy = context.energy();
//!
//! let block = energy.block_energy("0000000000000000000...").await?;
//! let wallet = energy.wallet_energy("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa").await?;
//! println!("{} W for the block, {} W for the wallet", block.consumed_energy, wallet.consumed_energy);
//! ```

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, Instrument, Span};

use super::types::{energy_for, BlockEnergy, TransactionEnergy, WalletEnergy};
use crate::config::ExplorerConfig;
use crate::errors::ExplorerError;
use crate::explorer::{BlockchainExplorer, WalletPage};
use crate::tracing::spans;
use crate::transport::ExplorerTransport;

/// Number of pages needed for `total` transactions
fn page_count(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}

/// Computes energy figures from explorer data
pub struct EnergyCalculator<T> {
    pub(super) explorer: Arc<BlockchainExplorer<T>>,
    pub(super) watt_per_byte: u64,
    pub(super) max_days_back: u64,
    pub(super) batch_size: usize,
    wallet_page_size: u64,
    wallet_max_pages: u64,
}

impl<T> Clone for EnergyCalculator<T> {
    fn clone(&self) -> Self {
        Self {
            explorer: self.explorer.clone(),
            watt_per_byte: self.watt_per_byte,
            max_days_back: self.max_days_back,
            batch_size: self.batch_size,
            wallet_page_size: self.wallet_page_size,
            wallet_max_pages: self.wallet_max_pages,
        }
    }
}

impl<T: ExplorerTransport> EnergyCalculator<T> {
    /// Creates a calculator with the factors and limits from `config`
    pub fn new(explorer: Arc<BlockchainExplorer<T>>, config: &ExplorerConfig) -> Self {
        Self {
            explorer,
            watt_per_byte: config.watt_per_byte,
            max_days_back: config.max_days_back,
            batch_size: config.http_batch_size.max(1),
            wallet_page_size: config.wallet_page_size.max(1),
            wallet_max_pages: config.wallet_max_pages.max(1),
        }
    }

    /// The explorer this calculator reads from
    pub fn explorer(&self) -> &Arc<BlockchainExplorer<T>> {
        &self.explorer
    }

    /// Energy of a block and each of its transactions
    pub async fn block_energy(&self, hash: &str) -> Result<BlockEnergy, ExplorerError> {
        let block = self
            .explorer
            .fetch_block(hash)
            .instrument(spans::block_energy(hash))
            .await?;
        Ok(BlockEnergy::from_summary(block, self.watt_per_byte))
    }

    /// Energy of a single transaction
    pub async fn transaction_energy(&self, hash: &str) -> Result<TransactionEnergy, ExplorerError> {
        let tx = self
            .explorer
            .fetch_transaction(hash)
            .instrument(spans::transaction_energy(hash))
            .await?;
        Ok(TransactionEnergy::from_summary(tx, self.watt_per_byte))
    }

    /// Energy of every transaction of a wallet.
    ///
    /// The first page tells how many transactions the wallet has; the
    /// remaining pages are fetched in concurrent waves of the batch size. Any
    /// page failing fails the whole call, since a partial wallet total would
    /// be silently wrong.
    ///
    /// A transaction count needing more than the configured maximum number of
    /// pages is rejected as [`ExplorerError::UpstreamData`] before any further
    /// page is requested.
    pub async fn wallet_energy(&self, address: &str) -> Result<WalletEnergy, ExplorerError> {
        async move {
            let first = self.explorer.fetch_wallet_page(address, 0).await?;
            let total_pages = page_count(first.total_transaction_count, self.wallet_page_size);
            if total_pages > self.wallet_max_pages {
                return Err(ExplorerError::upstream_data(
                    format!("rawaddr/{address}"),
                    format!(
                        "n_tx {} needs {total_pages} pages, more than the limit of {}",
                        first.total_transaction_count, self.wallet_max_pages
                    ),
                ));
            }
            Span::current().record("pages", total_pages);
            info!(
                address,
                total_transactions = first.total_transaction_count,
                total_pages,
                "Fetching wallet transactions"
            );

            let offsets: Vec<u64> = (1..total_pages)
                .map(|page| page * self.wallet_page_size)
                .collect();

            let mut pages: Vec<WalletPage> = Vec::with_capacity(offsets.len() + 1);
            let address_on_record = first.address.clone();
            let total_transactions = first.total_transaction_count;
            pages.push(first);

            for wave in offsets.chunks(self.batch_size) {
                let results = join_all(
                    wave.iter()
                        .map(|&offset| self.explorer.fetch_wallet_page(address, offset)),
                )
                .await;
                for result in results {
                    pages.push(result?);
                }
            }

            let transactions: Vec<TransactionEnergy> = pages
                .into_iter()
                .flat_map(|page| page.transactions)
                .map(|tx| TransactionEnergy::from_summary(tx, self.watt_per_byte))
                .collect();
            let consumed_energy = transactions
                .iter()
                .fold(0u64, |sum, tx| sum.saturating_add(tx.consumed_energy));

            Ok::<_, ExplorerError>(WalletEnergy {
                address: address_on_record,
                total_transactions,
                consumed_energy,
                transactions,
            })
        }
        .instrument(spans::wallet_energy(address))
        .await
    }

    /// Energy for a number of bytes at this calculator's factor
    pub fn energy_for_bytes(&self, size_bytes: u64) -> u64 {
        energy_for(size_bytes, self.watt_per_byte)
    }
}

impl<T> std::fmt::Debug for EnergyCalculator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnergyCalculator")
            .field("watt_per_byte", &self.watt_per_byte)
            .field("max_days_back", &self.max_days_back)
            .field("batch_size", &self.batch_size)
            .field("wallet_page_size", &self.wallet_page_size)
            .field("wallet_max_pages", &self.wallet_max_pages)
            .finish_non_exhaustive()
    }
}
