//! Domain values produced by the data-access layer
//!
//! These are normalized copies of explorer payloads holding only what the
//! energy computations need. They are also what the cache stores.

use serde::{Deserialize, Serialize};

/// A transaction's size and time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub size_bytes: u64,
    /// Unix seconds
    pub unix_time: i64,
}

/// A block's size and time, with its transactions in block order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub hash: String,
    pub size_bytes: u64,
    /// Unix seconds
    pub unix_time: i64,
    pub transactions: Vec<TransactionSummary>,
}

/// One page of a wallet's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPage {
    pub address: String,
    /// Total transactions of the wallet across all pages
    pub total_transaction_count: u64,
    pub transactions: Vec<TransactionSummary>,
    /// Offset this page was requested at
    pub page_offset: u64,
}

impl WalletPage {
    /// Whether the page holds no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
