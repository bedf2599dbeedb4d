//! Shape validation for raw explorer payloads
//!
//! Payloads are decoded into private raw structs that name only the required
//! fields; anything else the explorer sends is ignored. A missing or mistyped
//! field becomes [`ExplorerError::UpstreamData`].

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::types::{BlockSummary, TransactionSummary, WalletPage};
use crate::errors::ExplorerError;

#[derive(Debug, Deserialize)]
struct RawTransaction {
    hash: String,
    size: u64,
    time: i64,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    hash: String,
    size: u64,
    time: i64,
    tx: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
struct RawWallet {
    address: String,
    n_tx: u64,
    txs: Vec<RawTransaction>,
}

impl From<RawTransaction> for TransactionSummary {
    fn from(raw: RawTransaction) -> Self {
        Self {
            hash: raw.hash,
            size_bytes: raw.size,
            unix_time: raw.time,
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(path: &str, body: Value) -> Result<T, ExplorerError> {
    serde_json::from_value(body).map_err(|e| ExplorerError::upstream_data(path, e.to_string()))
}

/// Validates a `rawblock` payload
pub(crate) fn parse_block(path: &str, body: Value) -> Result<BlockSummary, ExplorerError> {
    let raw: RawBlock = decode(path, body)?;
    Ok(BlockSummary {
        hash: raw.hash,
        size_bytes: raw.size,
        unix_time: raw.time,
        transactions: raw.tx.into_iter().map(Into::into).collect(),
    })
}

/// Validates a `rawtx` payload
pub(crate) fn parse_transaction(path: &str, body: Value) -> Result<TransactionSummary, ExplorerError> {
    decode::<RawTransaction>(path, body).map(Into::into)
}

/// Validates a `rawaddr` payload
pub(crate) fn parse_wallet_page(
    path: &str,
    body: Value,
    page_offset: u64,
) -> Result<WalletPage, ExplorerError> {
    let raw: RawWallet = decode(path, body)?;
    Ok(WalletPage {
        address: raw.address,
        total_transaction_count: raw.n_tx,
        transactions: raw.txs.into_iter().map(Into::into).collect(),
        page_offset,
    })
}

/// Extracts block hashes from a day listing
///
/// The listing itself must be an array. Entries without a string `hash` are
/// dropped with a warning rather than failing the whole day.
pub(crate) fn parse_block_hashes(path: &str, body: Value) -> Result<Vec<String>, ExplorerError> {
    let Value::Array(entries) = body else {
        return Err(ExplorerError::upstream_data(path, "expected an array of blocks"));
    };

    let total = entries.len();
    let hashes: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry.get("hash") {
            Some(Value::String(hash)) => Some(hash.clone()),
            _ => None,
        })
        .collect();

    if hashes.len() < total {
        warn!(
            path,
            dropped = total - hashes.len(),
            "Dropped day listing entries without a hash"
        );
    }

    Ok(hashes)
}
