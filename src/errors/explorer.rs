//! Error types for blockchain data access.
//!
//! This module provides error types for the operations of
//! [`crate::explorer::BlockchainExplorer`].

use super::TransportError;

/// Errors that can occur while fetching blocks, transactions and wallets.
///
/// # Examples
///
/// ```rust,ignore
/// use blockwatt::ExplorerError;
///
/// match explorer.fetch_block(hash).await {
///     Ok(block) => println!("{} bytes", block.size_bytes),
///     Err(ExplorerError::InvalidArgument { name, reason }) => {
///         eprintln!("Bad {name}: {reason}");
///     }
///     Err(ExplorerError::UpstreamData { path, details }) => {
///         eprintln!("Explorer returned garbage for {path}: {details}");
///     }
///     Err(ExplorerError::Transport(e)) => eprintln!("Explorer unreachable: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// A caller-supplied identifier failed validation.
    ///
    /// Never retried.
    #[error("Invalid {name}: {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The explorer responded, but the payload is missing required fields.
    #[error("Malformed explorer payload for {path}: {details}")]
    UpstreamData {
        /// Request path that produced the payload
        path: String,
        /// Which field was missing or mistyped
        details: String,
    },

    /// The request itself failed after the transport exhausted its retries.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ExplorerError {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        ExplorerError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create an `UpstreamData` error.
    pub fn upstream_data(path: impl Into<String>, details: impl Into<String>) -> Self {
        ExplorerError::UpstreamData {
            path: path.into(),
            details: details.into(),
        }
    }
}
