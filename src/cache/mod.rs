// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Object cache in front of the block explorer
//!
//! Blocks, transactions and wallet pages are cached as JSON strings so that a
//! single store can hold every domain type. The module is split into:
//!
//! - [`Cache`]: Typed front-end that serializes on write and deserializes on read
//! - [`CacheBackend`]: Storage trait for the serialized entries
//! - [`MemoryCache`]: In-memory backend with TTL and LRU size limits (default)
//! - [`NoOpCache`]: Disables caching entirely
//!
//! # Examples
//!
//! ```rust
//! use blockwatt::cache::{Cache, MemoryCache};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), blockwatt::CacheError> {
//! let cache = Cache::new(
//!     MemoryCache::new()
//!         .with_max_entries(1000)
//!         .with_default_ttl(Duration::from_secs(86_400)),
//! );
//!
//! cache.set("answer", &42u64, None).await?;
//! assert_eq!(cache.get::<u64>("answer").await, Some(42));
//!
//! // Wallet pages go stale faster
//! cache.set("wallet:1abc:0", &"page", Some(Duration::from_secs(3_600))).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ExplorerConfig;
use crate::errors::CacheError;

mod memory;
mod noop;
pub mod types;

pub use memory::MemoryCache;
pub use noop::NoOpCache;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits (successful retrievals)
    pub hits: u64,
    /// Number of cache misses (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to size limits
    pub evictions: u64,
    /// Number of entries expired due to TTL
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Trait for cache storage backends
///
/// Backends store opaque serialized values; typing happens in [`Cache`].
///
/// # Thread Safety
///
/// Implementations must be thread-safe and support concurrent access from the
/// aggregation fan-out. Use interior mutability (e.g., `Mutex`) as needed.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Retrieves a live entry, refreshing its recency
    ///
    /// Returns `None` if the key is absent or the entry has expired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Inserts or replaces an entry
    ///
    /// `ttl` overrides the backend default lifetime. If the backend is full,
    /// this may evict the least recently used entry.
    async fn insert(&self, key: String, value: String, ttl: Option<Duration>);

    /// Removes an entry, returning whether it was present
    async fn remove(&self, key: &str) -> bool;

    /// Removes all entries
    async fn clear(&self);

    /// Number of live entries
    async fn size(&self) -> usize;

    /// Whether a live entry exists, without refreshing its recency
    async fn contains(&self, key: &str) -> bool;

    /// Returns current cache statistics
    async fn stats(&self) -> CacheStats;

    /// Returns a human-readable name for this backend
    fn name(&self) -> &'static str;
}

/// Typed cache front-end
///
/// Values are encoded as JSON on [`Cache::set`] and decoded on [`Cache::get`].
/// An entry that no longer decodes into the requested type is logged and
/// reported as a miss so the caller falls through to the explorer.
pub struct Cache {
    backend: Box<dyn CacheBackend>,
}

impl Cache {
    /// Creates a cache over the given backend
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Creates a bounded in-memory cache sized from the configuration
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(
            MemoryCache::new()
                .with_max_entries(config.cache_max_size)
                .with_default_ttl(config.cache_default_ttl),
        )
    }

    /// Creates a cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(NoOpCache)
    }

    /// Reads and decodes an entry
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let serialized = self.backend.get(key).await?;

        match serde_json::from_str(&serialized) {
            Ok(value) => Some(value),
            Err(e) => {
                error!(key, error = %e, "Failed to deserialize cache entry");
                None
            }
        }
    }

    /// Encodes and stores an entry
    ///
    /// `ttl` of `None` uses the backend default lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Encoding`] if the value cannot be serialized;
    /// nothing is stored in that case.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let serialized = serde_json::to_string(value).map_err(|source| {
            error!(key, error = %source, "Failed to serialize cache entry");
            CacheError::Encoding {
                key: key.to_string(),
                source,
            }
        })?;

        self.backend.insert(key.to_string(), serialized, ttl).await;
        debug!(
            key,
            ttl_ms = ttl.map(|t| t.as_millis() as u64),
            backend = self.backend.name(),
            "Cache SET"
        );
        Ok(())
    }

    /// Removes an entry, returning whether it was present
    pub async fn delete(&self, key: &str) -> bool {
        self.backend.remove(key).await
    }

    /// Removes all entries
    pub async fn clear(&self) {
        self.backend.clear().await
    }

    /// Number of live entries
    pub async fn size(&self) -> usize {
        self.backend.size().await
    }

    /// Whether a live entry exists
    pub async fn has(&self, key: &str) -> bool {
        self.backend.contains(key).await
    }

    /// Returns current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.backend.stats().await
    }

    /// Name of the backing store, for logging
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        hash: String,
        size: u64,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not serializable"))
        }
    }

    #[tokio::test]
    async fn test_set_then_get_returns_equal_value() {
        let cache = Cache::new(MemoryCache::new());
        let sample = Sample {
            hash: "abc".to_string(),
            size: 285,
        };

        cache.set("abc", &sample, None).await.unwrap();
        assert_eq!(cache.get::<Sample>("abc").await, Some(sample));
        assert!(cache.has("abc").await);
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_decode_failure_is_a_miss() {
        let cache = Cache::new(MemoryCache::new());
        cache.set("abc", &"just a string", None).await.unwrap();

        assert_eq!(cache.get::<Sample>("abc").await, None);
        // The raw entry is still there for callers that asked for the right type
        assert_eq!(
            cache.get::<String>("abc").await.as_deref(),
            Some("just a string")
        );
    }

    #[tokio::test]
    async fn test_unserializable_value_is_an_encoding_error() {
        let cache = Cache::new(MemoryCache::new());
        let err = cache.set("bad", &Unserializable, None).await.unwrap_err();

        assert!(matches!(err, CacheError::Encoding { ref key, .. } if key.as_str() == "bad"));
        assert!(!cache.has("bad").await);
    }

    #[tokio::test]
    async fn test_non_string_map_keys_fail_to_encode() {
        let cache = Cache::new(MemoryCache::new());
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "tuple keys are not valid JSON object keys");

        assert!(cache.set("map", &map, None).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let cache = Cache::from_config(&ExplorerConfig::default());
        cache.set("a", &1u32, None).await.unwrap();
        cache.set("b", &2u32, None).await.unwrap();

        assert!(cache.delete("a").await);
        assert!(!cache.delete("a").await);
        assert_eq!(cache.size().await, 1);

        cache.clear().await;
        assert_eq!(cache.size().await, 0);
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = Cache::disabled();
        cache.set("a", &1u32, None).await.unwrap();

        assert_eq!(cache.get::<u32>("a").await, None);
        assert_eq!(cache.backend_name(), "NoOpCache");
    }
}
