// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-day energy consumption over a range of UTC days
//!
//! The pipeline runs in two phases:
//!
//! 1. Block listings for the requested days, fetched in concurrent waves of
//!    the batch size, one wave after the other.
//! 2. For every day concurrently, the listed blocks, again in waves of the
//!    batch size. A day's energy is the sum of its block sizes times the
//!    watts-per-byte factor.
//!
//! Failures of a single block or a single listing never fail the pipeline:
//! they are logged and show up on the affected [`DayEnergyRecord`].

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{info, warn, Instrument, Span};

use super::calculator::EnergyCalculator;
use super::types::{energy_for, DayEnergyRecord};
use crate::days::day_timestamps_until_today;
use crate::errors::{AggregationError, ExplorerError};
use crate::tracing::spans;
use crate::transport::ExplorerTransport;

impl<T: ExplorerTransport> EnergyCalculator<T> {
    /// Energy consumed on each UTC day from `num_days_back` days ago through
    /// today.
    ///
    /// Returns one record per day, keyed by the day's UTC-midnight Unix
    /// milliseconds.
    ///
    /// # Errors
    ///
    /// [`AggregationError::DateRangeExceeded`] when `num_days_back + 1` days
    /// exceed the configured maximum. Nothing is fetched in that case.
    pub async fn consumption_per_day(
        &self,
        num_days_back: u64,
    ) -> Result<BTreeMap<i64, DayEnergyRecord>, AggregationError> {
        let requested_days = num_days_back.saturating_add(1);
        if requested_days > self.max_days_back {
            return Err(AggregationError::DateRangeExceeded {
                requested_days,
                max_days: self.max_days_back,
            });
        }

        let days = day_timestamps_until_today(num_days_back);
        Ok(self
            .consumption_for_days(&days)
            .instrument(spans::consumption_per_day(num_days_back))
            .await)
    }

    /// Energy consumed on each of the given days (UTC-midnight Unix
    /// milliseconds).
    ///
    /// No range limit applies here; callers are expected to have checked it.
    pub async fn consumption_for_days(&self, days: &[i64]) -> BTreeMap<i64, DayEnergyRecord> {
        let mut listings: Vec<(i64, Result<Vec<String>, ExplorerError>)> =
            Vec::with_capacity(days.len());

        for wave in days.chunks(self.batch_size) {
            let results = join_all(wave.iter().map(|&day| async move {
                (day, self.explorer.fetch_block_hashes_for_day(day).await)
            }))
            .await;
            listings.extend(results);
        }

        let records = join_all(
            listings
                .into_iter()
                .map(|(day, listing)| self.day_record(day, listing)),
        )
        .await;

        let degraded = records.iter().filter(|r| r.is_degraded()).count();
        info!(days = records.len(), degraded, "Computed per-day consumption");

        records
            .into_iter()
            .map(|record| (record.day_timestamp_ms, record))
            .collect()
    }

    async fn day_record(
        &self,
        day_timestamp_ms: i64,
        listing: Result<Vec<String>, ExplorerError>,
    ) -> DayEnergyRecord {
        let hashes = match listing {
            Ok(hashes) => hashes,
            Err(e) => {
                warn!(day_timestamp_ms, error = %e, "Failed to list blocks for day");
                return DayEnergyRecord::listing_failed(day_timestamp_ms);
            }
        };

        let block_count = hashes.len();
        async move {
            let mut total_bytes = 0u64;
            let mut blocks_failed = 0usize;

            for wave in hashes.chunks(self.batch_size) {
                let results = join_all(wave.iter().map(|hash| self.explorer.fetch_block(hash))).await;

                for (hash, result) in wave.iter().zip(results) {
                    match result {
                        Ok(block) => total_bytes = total_bytes.saturating_add(block.size_bytes),
                        Err(e) => {
                            blocks_failed += 1;
                            warn!(day_timestamp_ms, hash = %hash, error = %e, "Failed to fetch block");
                        }
                    }
                }
            }

            Span::current().record("failed_blocks", blocks_failed);

            DayEnergyRecord {
                day_timestamp_ms,
                consumed_energy_watts: energy_for(total_bytes, self.watt_per_byte),
                blocks_total: block_count,
                blocks_failed,
                hash_list_failed: false,
            }
        }
        .instrument(spans::day_consumption(day_timestamp_ms, block_count))
        .await
    }
}
