//! Error types for the object cache.

/// Errors that can occur when writing to the cache.
///
/// Reads never fail: a missing, expired or undecodable entry is a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The value could not be serialized for storage.
    #[error("Failed to encode cache entry {key}")]
    Encoding {
        /// Key the value was being stored under
        key: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}
