// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory cache backend with per-entry TTL and LRU size limits

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    types::{AccessSequence, Expiry},
    CacheBackend, CacheStats,
};

/// Entry in the memory cache with metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized value
    value: String,
    /// When this entry stops being served
    expires_at: Expiry,
    /// Last access, for LRU eviction
    access_seq: AccessSequence,
}

impl CacheEntry {
    fn touch(&mut self, access_seq: AccessSequence) {
        self.access_seq = access_seq;
    }
}

/// Configuration for memory cache
#[derive(Debug, Clone, Default)]
struct MemoryCacheConfig {
    /// Maximum number of entries before eviction starts
    max_entries: Option<usize>,
    /// TTL applied when a write does not specify one
    default_ttl: Option<Duration>,
}

/// Internal state for memory cache
#[derive(Debug, Default)]
struct MemoryCacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

impl MemoryCacheState {
    fn take_seq(&mut self) -> AccessSequence {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.next();
        seq
    }

    fn purge_expired(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.expires_at.is_expired());
        let purged = before - self.entries.len();
        if purged > 0 {
            self.stats.expirations += purged as u64;
            debug!(purged, "Purged expired cache entries");
        }
        self.stats.entries = self.entries.len();
    }
}

/// In-memory cache with per-entry TTL and LRU size limits
///
/// This cache stores serialized values in a HashMap. It supports:
/// - A default TTL, overridable on every write
/// - Optional size limits with LRU (least recently used) eviction, where a
///   read hit counts as a use
/// - Thread-safe concurrent access
///
/// # Examples
///
/// ```rust
/// use blockwatt::cache::MemoryCache;
/// use std::time::Duration;
///
/// // Unbounded cache, entries never expire
/// let cache = MemoryCache::new();
///
/// // 1000 entries, 24 hour default lifetime
/// let cache = MemoryCache::new()
///     .with_max_entries(1000)
///     .with_default_ttl(Duration::from_secs(86_400));
/// ```
///
/// # Performance
///
/// - Get: O(1) average case (HashMap lookup)
/// - Insert: O(1) without eviction, O(n) with eviction (finds LRU)
#[derive(Debug)]
pub struct MemoryCache {
    config: MemoryCacheConfig,
    state: Mutex<MemoryCacheState>,
}

impl MemoryCache {
    /// Creates a new memory cache with no limits
    pub fn new() -> Self {
        Self {
            config: MemoryCacheConfig::default(),
            state: Mutex::new(MemoryCacheState::default()),
        }
    }

    /// Sets the maximum number of entries in the cache
    ///
    /// When the limit is reached, the least recently used (LRU) entry will be evicted
    /// to make room for new entries.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = Some(max_entries);
        self
    }

    /// Sets the lifetime applied to writes that do not specify their own
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = Some(ttl);
        self
    }

    /// Evicts the least recently used entry from the cache
    fn evict_lru(state: &mut MemoryCacheState) {
        let lru_key = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.access_seq)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            debug!(key = %key, "Evicting LRU cache entry");
            state.entries.remove(&key);
            state.stats.evictions += 1;
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock().await;
        let seq = state.next_seq;

        let expired = match state.entries.get(key).map(|entry| entry.expires_at.is_expired()) {
            Some(expired) => expired,
            None => {
                state.stats.misses += 1;
                debug!(key, "Cache miss (memory)");
                return None;
            }
        };

        if expired {
            debug!(key, "Cache entry expired");
            state.entries.remove(key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            state.stats.entries = state.entries.len();
            return None;
        }

        let value = state.entries.get_mut(key).map(|entry| {
            entry.touch(seq);
            entry.value.clone()
        });
        state.next_seq = seq.next();
        state.stats.hits += 1;
        debug!(key, entries = state.entries.len(), "Cache hit (memory)");

        value
    }

    async fn insert(&self, key: String, value: String, ttl: Option<Duration>) {
        let mut state = self.state.lock().await;
        let ttl = ttl.or(self.config.default_ttl);

        // Replacing an existing key never needs room
        if !state.entries.contains_key(&key) {
            if let Some(max_entries) = self.config.max_entries {
                if state.entries.len() >= max_entries {
                    state.purge_expired();
                }
                while !state.entries.is_empty() && state.entries.len() >= max_entries {
                    Self::evict_lru(&mut state);
                }
            }
        }

        let seq = state.take_seq();
        debug!(key = %key, ttl_ms = ttl.map(|t| t.as_millis() as u64), "Inserting entry into memory cache");
        state.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Expiry::after(ttl),
                access_seq: seq,
            },
        );
        state.stats.entries = state.entries.len();
    }

    async fn remove(&self, key: &str) -> bool {
        let mut state = self.state.lock().await;
        let removed = state.entries.remove(key).is_some();
        state.stats.entries = state.entries.len();
        removed
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        debug!(entries = state.entries.len(), "Clearing memory cache");
        state.entries.clear();
        state.stats.entries = 0;
    }

    async fn size(&self) -> usize {
        let mut state = self.state.lock().await;
        state.purge_expired();
        state.entries.len()
    }

    async fn contains(&self, key: &str) -> bool {
        let state = self.state.lock().await;
        state
            .entries
            .get(key)
            .is_some_and(|entry| !entry.expires_at.is_expired())
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        state.stats.clone()
    }

    fn name(&self) -> &'static str {
        "MemoryCache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: u32) -> String {
        format!("{{\"n\":{n}}}")
    }

    #[tokio::test]
    async fn test_memory_cache_basic_operations() {
        let cache = MemoryCache::new();

        // Cache miss initially
        assert!(cache.get("block-a").await.is_none());

        cache.insert("block-a".to_string(), value(1), None).await;
        assert_eq!(cache.get("block-a").await, Some(value(1)));

        // Stats should show 1 hit, 1 miss
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_size_limit() {
        let cache = MemoryCache::new().with_max_entries(3);

        for n in 1..=3 {
            cache.insert(format!("k{n}"), value(n), None).await;
        }
        assert_eq!(cache.size().await, 3);

        // Access k1 to make it recently used
        assert!(cache.get("k1").await.is_some());

        // Insert k4 - should evict k2 (least recently used)
        cache.insert("k4".to_string(), value(4), None).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.evictions, 1);

        assert!(cache.contains("k1").await);
        assert!(cache.contains("k3").await);
        assert!(cache.contains("k4").await);
        assert!(!cache.contains("k2").await);
    }

    #[tokio::test]
    async fn test_memory_cache_replace_does_not_evict() {
        let cache = MemoryCache::new().with_max_entries(2);
        cache.insert("a".to_string(), value(1), None).await;
        cache.insert("b".to_string(), value(2), None).await;

        cache.insert("a".to_string(), value(10), None).await;

        assert_eq!(cache.size().await, 2);
        assert_eq!(cache.get("a").await, Some(value(10)));
        assert!(cache.contains("b").await);
        assert_eq!(cache.stats().await.evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_default_ttl() {
        let cache = MemoryCache::new().with_default_ttl(Duration::from_secs(60));
        cache.insert("a".to_string(), value(1), None).await;
        assert!(cache.get("a").await.is_some());

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_per_entry_ttl_override() {
        let cache = MemoryCache::new().with_default_ttl(Duration::from_secs(86_400));
        cache
            .insert("wallet".to_string(), value(1), Some(Duration::from_secs(3_600)))
            .await;
        cache.insert("block".to_string(), value(2), None).await;

        tokio::time::advance(Duration::from_secs(3_601)).await;

        assert!(!cache.contains("wallet").await);
        assert!(cache.contains("block").await);
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_expired_entries_make_room_before_eviction() {
        let cache = MemoryCache::new().with_max_entries(2);
        cache
            .insert("short".to_string(), value(1), Some(Duration::from_secs(1)))
            .await;
        cache.insert("long".to_string(), value(2), None).await;

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.insert("new".to_string(), value(3), None).await;

        assert!(cache.contains("long").await);
        assert!(cache.contains("new").await);
        assert_eq!(cache.stats().await.evictions, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_remove_and_clear() {
        let cache = MemoryCache::new();
        for n in 1..=5 {
            cache.insert(format!("k{n}"), value(n), None).await;
        }

        assert!(cache.remove("k1").await);
        assert!(!cache.remove("k1").await);
        assert_eq!(cache.size().await, 4);

        cache.clear().await;
        assert_eq!(cache.size().await, 0);
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_hit_rate() {
        let cache = MemoryCache::new();

        cache.get("k").await;
        cache.insert("k".to_string(), value(1), None).await;
        cache.get("k").await;
        cache.get("k").await;
        cache.get("k").await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 75.0);
    }
}
