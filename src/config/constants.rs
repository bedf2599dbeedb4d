//! Default values for explorer access and energy estimation
//!
//! This module centralizes the magic constants used throughout the blockwatt
//! crate. Every value can be overridden through [`crate::ExplorerConfig`].

/// Public blockchain.info API root
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://blockchain.info/";

/// Energy attributed to a single byte of on-chain data, in watts.
///
/// Kept as an integer so that serialized energy figures never pick up
/// floating point noise.
pub const WATT_PER_BYTE: u64 = 4_560;

/// Maximum number of days (today included) a per-day query may cover
pub const MAX_DAYS_BACK: u64 = 3;

/// Number of explorer calls issued together in one wave
pub const HTTP_BATCH_SIZE: usize = 5;

/// Maximum number of entries held by the in-memory cache
pub const CACHE_MAX_SIZE: usize = 1_000;

/// Default cache entry lifetime (1 day)
pub const CACHE_DEFAULT_TTL_MS: u64 = 24 * 60 * 60 * 1_000;

/// Cache lifetime for wallet pages, which change whenever the wallet transacts (1 hour)
pub const WALLET_CACHE_TTL_MS: u64 = 60 * 60 * 1_000;

/// Transactions per wallet page returned by the explorer
pub const WALLET_PAGE_SIZE: u64 = 50;

/// Upper bound on the pages fetched for one wallet
///
/// Wallets claiming more transactions than this many pages can hold are
/// rejected as malformed upstream data.
pub const WALLET_MAX_PAGES: u64 = 2_000;

/// Per-request HTTP timeout
pub const HTTP_REQUEST_TIMEOUT_MS: u64 = 3_000;

/// Minimum spacing between two dispatches to the same endpoint group (1 RPS)
pub const MIN_REQUEST_INTERVAL_MS: u64 = 1_000;

/// Total attempts per request, the initial one included
pub const HTTP_MAX_ATTEMPTS: u32 = 3;

/// First backoff delay; doubled on every further attempt
pub const HTTP_RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Upper bound on a single backoff delay
pub const HTTP_RETRY_MAX_DELAY_MS: u64 = 30_000;
