//! Error types for configuration loading.

/// Errors that can occur when building an [`crate::ExplorerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A setting has a value that cannot be used.
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// Setting (environment variable) name
        name: &'static str,
        /// The rejected raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create an `InvalidValue` error.
    pub fn invalid_value(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
