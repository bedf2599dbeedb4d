//! No-operation cache that disables caching entirely

use async_trait::async_trait;
use std::time::Duration;

use super::{CacheBackend, CacheStats};

/// A no-operation cache that disables caching entirely
///
/// This backend always returns `None` for reads and ignores writes, so every
/// explorer operation goes to the network.
///
/// # Examples
///
/// ```rust
/// use blockwatt::cache::{Cache, NoOpCache};
///
/// let cache = Cache::new(NoOpCache);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl CacheBackend for NoOpCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn insert(&self, _key: String, _value: String, _ttl: Option<Duration>) {}

    async fn remove(&self, _key: &str) -> bool {
        false
    }

    async fn clear(&self) {}

    async fn size(&self) -> usize {
        0
    }

    async fn contains(&self, _key: &str) -> bool {
        false
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "NoOpCache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_cache_ignores_writes() {
        let cache = NoOpCache;
        cache.insert("k".to_string(), "v".to_string(), None).await;

        assert!(cache.get("k").await.is_none());
        assert!(!cache.contains("k").await);
        assert_eq!(cache.size().await, 0);
        assert_eq!(cache.stats().await.hits, 0);
    }
}
