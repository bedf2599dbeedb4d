//! Strong types for cache metadata
//!
//! - [`Expiry`]: Point in time after which an entry is no longer served
//! - [`AccessSequence`]: Monotonic sequence number for deterministic LRU ordering

use std::time::Duration;

use tokio::time::Instant;

/// Point in time after which a cache entry is considered stale
///
/// Measured on the tokio clock so that paused-time tests can step past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry(Option<Instant>);

impl Expiry {
    /// An expiry `ttl` from now, or never if no TTL applies
    pub fn after(ttl: Option<Duration>) -> Self {
        Self(ttl.map(|ttl| Instant::now() + ttl))
    }

    /// An entry that never expires
    pub fn never() -> Self {
        Self(None)
    }

    /// Checks whether the entry has expired
    ///
    /// An entry is stale from its expiry instant onwards, so a zero TTL is
    /// never served.
    pub fn is_expired(&self) -> bool {
        match self.0 {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }
}

/// Monotonic sequence number for deterministic LRU ordering
///
/// Every read hit and every write takes the next sequence number, so the
/// entry with the lowest number is the least recently accessed one.
///
/// # Examples
///
/// ```
/// use blockwatt::cache::types::AccessSequence;
///
/// let seq1 = AccessSequence::default();
/// let seq2 = seq1.next();
/// assert!(seq1 < seq2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessSequence(u64);

impl AccessSequence {
    /// Returns the next sequence number
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
