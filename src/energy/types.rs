//! Energy reports returned by [`super::EnergyCalculator`]

use serde::{Deserialize, Serialize};

use crate::explorer::{BlockSummary, TransactionSummary};

/// Energy attributed to a number of bytes
pub(crate) fn energy_for(size_bytes: u64, watt_per_byte: u64) -> u64 {
    size_bytes.saturating_mul(watt_per_byte)
}

/// Energy consumed by one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnergy {
    pub hash: String,
    pub size: u64,
    pub time: i64,
    /// Watts
    pub consumed_energy: u64,
}

impl TransactionEnergy {
    pub(crate) fn from_summary(tx: TransactionSummary, watt_per_byte: u64) -> Self {
        Self {
            consumed_energy: energy_for(tx.size_bytes, watt_per_byte),
            hash: tx.hash,
            size: tx.size_bytes,
            time: tx.unix_time,
        }
    }
}

/// Energy consumed by one block, broken down by transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEnergy {
    pub hash: String,
    pub size: u64,
    pub time: i64,
    /// Watts, for the whole block
    pub consumed_energy: u64,
    pub transactions: Vec<TransactionEnergy>,
}

impl BlockEnergy {
    pub(crate) fn from_summary(block: BlockSummary, watt_per_byte: u64) -> Self {
        Self {
            consumed_energy: energy_for(block.size_bytes, watt_per_byte),
            hash: block.hash,
            size: block.size_bytes,
            time: block.unix_time,
            transactions: block
                .transactions
                .into_iter()
                .map(|tx| TransactionEnergy::from_summary(tx, watt_per_byte))
                .collect(),
        }
    }
}

/// Energy consumed by every transaction of a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEnergy {
    pub address: String,
    /// Transaction count reported by the explorer
    pub total_transactions: u64,
    /// Watts, summed over `transactions`
    pub consumed_energy: u64,
    pub transactions: Vec<TransactionEnergy>,
}

/// Energy consumed on one UTC day
///
/// A record exists for every requested day. When some of the day's fetches
/// failed the energy only covers what was fetched and the record is
/// [degraded](DayEnergyRecord::is_degraded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEnergyRecord {
    /// Unix milliseconds of the day's UTC midnight
    pub day_timestamp_ms: i64,
    /// Watts
    pub consumed_energy_watts: u64,
    /// Blocks listed for the day
    pub blocks_total: usize,
    /// Listed blocks that could not be fetched
    pub blocks_failed: usize,
    /// Whether the day's block listing itself could not be fetched
    pub hash_list_failed: bool,
}

impl DayEnergyRecord {
    /// Record for a day whose block listing could not be fetched
    pub(crate) fn listing_failed(day_timestamp_ms: i64) -> Self {
        Self {
            day_timestamp_ms,
            consumed_energy_watts: 0,
            blocks_total: 0,
            blocks_failed: 0,
            hash_list_failed: true,
        }
    }

    /// Whether any of the day's fetches failed
    pub fn is_degraded(&self) -> bool {
        self.hash_list_failed || self.blocks_failed > 0
    }
}
