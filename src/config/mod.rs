//! Configuration for blockwatt operations
//!
//! This module provides a flexible configuration system for controlling
//! explorer access, rate limiting, caching and energy estimation.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use blockwatt::ExplorerConfig;
//!
//! // blockchain.info, 1 request per second per endpoint, 3 days back
//! let config = ExplorerConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use blockwatt::ExplorerConfigBuilder;
//! use std::time::Duration;
//!
//! let config = ExplorerConfigBuilder::new()
//!     .min_request_interval(Duration::from_secs(2))
//!     .group_interval("rawaddr", Duration::from_secs(10))
//!     .max_days_back(7)
//!     .build();
//! ```
//!
//! # Example: From the environment
//!
//! ```rust,no_run
//! use blockwatt::ExplorerConfig;
//!
//! // Reads WATT_PER_BYTE, MAX_DAYS_BACK, HTTP_BATCH_SIZE, ... (and `.env`)
//! let config = ExplorerConfig::from_env()?;
//! # Ok::<(), blockwatt::ConfigError>(())
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;
use crate::transport::RetryConfig;

pub mod constants;

use constants::*;

/// Configuration for blockwatt operations
///
/// Use [`ExplorerConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Base URL that relative endpoint paths are joined onto
    pub base_url: Url,

    /// Host serving the per-day block listing (`blocks/{ms}`)
    ///
    /// Requests to it are issued as absolute URLs.
    pub day_listing_url: Url,

    /// Energy per byte, in watts
    pub watt_per_byte: u64,

    /// Maximum days a per-day query may cover, today included
    pub max_days_back: u64,

    /// Number of explorer calls issued together in one wave
    pub http_batch_size: usize,

    /// Maximum number of cached objects
    pub cache_max_size: usize,

    /// Default cache entry lifetime
    pub cache_default_ttl: Duration,

    /// Cache lifetime for wallet pages
    pub wallet_cache_ttl: Duration,

    /// Transactions per wallet page
    pub wallet_page_size: u64,

    /// Maximum pages fetched for one wallet
    pub wallet_max_pages: u64,

    /// Timeout for a single HTTP attempt
    pub http_request_timeout: Duration,

    /// Minimum spacing between dispatches to the same endpoint group
    pub min_request_interval: Duration,

    /// Endpoint-group specific spacing overrides
    pub group_overrides: HashMap<String, Duration>,

    /// Total attempts per request, the initial one included
    pub max_attempts: u32,

    /// First backoff delay for retries
    pub retry_base_delay: Duration,

    /// Cap on a single backoff delay
    pub retry_max_delay: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: default_url(),
            day_listing_url: default_url(),
            watt_per_byte: WATT_PER_BYTE,
            max_days_back: MAX_DAYS_BACK,
            http_batch_size: HTTP_BATCH_SIZE,
            cache_max_size: CACHE_MAX_SIZE,
            cache_default_ttl: Duration::from_millis(CACHE_DEFAULT_TTL_MS),
            wallet_cache_ttl: Duration::from_millis(WALLET_CACHE_TTL_MS),
            wallet_page_size: WALLET_PAGE_SIZE,
            wallet_max_pages: WALLET_MAX_PAGES,
            http_request_timeout: Duration::from_millis(HTTP_REQUEST_TIMEOUT_MS),
            min_request_interval: Duration::from_millis(MIN_REQUEST_INTERVAL_MS),
            group_overrides: HashMap::new(),
            max_attempts: HTTP_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(HTTP_RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_millis(HTTP_RETRY_MAX_DELAY_MS),
        }
    }
}

fn default_url() -> Url {
    Url::parse(DEFAULT_EXPLORER_BASE_URL).expect("default explorer URL is valid")
}

impl ExplorerConfig {
    /// Loads configuration from process environment variables.
    ///
    /// A `.env` file in the working directory is honoured. Unset variables keep
    /// their defaults; set but unparseable ones are an error.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `EXPLORER_BASE_URL` | `https://blockchain.info/` |
    /// | `EXPLORER_DAY_LISTING_URL` | `https://blockchain.info/` |
    /// | `WATT_PER_BYTE` | 4560 |
    /// | `MAX_DAYS_BACK` | 3 |
    /// | `HTTP_BATCH_SIZE` | 5 |
    /// | `CACHE_MAX_SIZE` | 1000 |
    /// | `CACHE_DEFAULT_TTL_MS` | 86400000 |
    /// | `WALLET_CACHE_TTL_MS` | 3600000 |
    /// | `WALLET_PAGE_SIZE` | 50 |
    /// | `WALLET_MAX_PAGES` | 2000 |
    /// | `HTTP_REQUEST_TIMEOUT_MS` | 3000 |
    /// | `MIN_REQUEST_INTERVAL_MS` | 1000 |
    /// | `HTTP_MAX_ATTEMPTS` | 3 |
    /// | `HTTP_RETRY_BASE_DELAY_MS` | 1000 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// [`ExplorerConfig::from_env`] delegates here; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            base_url: lookup_url(&lookup, "EXPLORER_BASE_URL", defaults.base_url)?,
            day_listing_url: lookup_url(
                &lookup,
                "EXPLORER_DAY_LISTING_URL",
                defaults.day_listing_url,
            )?,
            watt_per_byte: lookup_parsed(&lookup, "WATT_PER_BYTE", defaults.watt_per_byte)?,
            max_days_back: lookup_parsed(&lookup, "MAX_DAYS_BACK", defaults.max_days_back)?,
            http_batch_size: lookup_parsed(&lookup, "HTTP_BATCH_SIZE", defaults.http_batch_size)?,
            cache_max_size: lookup_parsed(&lookup, "CACHE_MAX_SIZE", defaults.cache_max_size)?,
            cache_default_ttl: lookup_millis(
                &lookup,
                "CACHE_DEFAULT_TTL_MS",
                defaults.cache_default_ttl,
            )?,
            wallet_cache_ttl: lookup_millis(
                &lookup,
                "WALLET_CACHE_TTL_MS",
                defaults.wallet_cache_ttl,
            )?,
            wallet_page_size: lookup_parsed(
                &lookup,
                "WALLET_PAGE_SIZE",
                defaults.wallet_page_size,
            )?,
            wallet_max_pages: lookup_parsed(
                &lookup,
                "WALLET_MAX_PAGES",
                defaults.wallet_max_pages,
            )?,
            http_request_timeout: lookup_millis(
                &lookup,
                "HTTP_REQUEST_TIMEOUT_MS",
                defaults.http_request_timeout,
            )?,
            min_request_interval: lookup_millis(
                &lookup,
                "MIN_REQUEST_INTERVAL_MS",
                defaults.min_request_interval,
            )?,
            group_overrides: HashMap::new(),
            max_attempts: lookup_parsed(&lookup, "HTTP_MAX_ATTEMPTS", defaults.max_attempts)?,
            retry_base_delay: lookup_millis(
                &lookup,
                "HTTP_RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay,
            )?,
            retry_max_delay: defaults.retry_max_delay,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that every size-like setting is usable.
    ///
    /// Zero batch, page or cache sizes and zero attempts would make the
    /// pipeline loop forever or never issue a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_batch_size == 0 {
            return Err(ConfigError::invalid_value("HTTP_BATCH_SIZE", "0", "must be greater than 0"));
        }
        if self.wallet_page_size == 0 {
            return Err(ConfigError::invalid_value("WALLET_PAGE_SIZE", "0", "must be greater than 0"));
        }
        if self.wallet_max_pages == 0 {
            return Err(ConfigError::invalid_value("WALLET_MAX_PAGES", "0", "must be greater than 0"));
        }
        if self.cache_max_size == 0 {
            return Err(ConfigError::invalid_value("CACHE_MAX_SIZE", "0", "must be greater than 0"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid_value("HTTP_MAX_ATTEMPTS", "0", "must be greater than 0"));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::invalid_value(
                "EXPLORER_BASE_URL",
                self.base_url.as_str(),
                "cannot be used as a base URL",
            ));
        }
        Ok(())
    }

    /// Get effective minimum request interval for an endpoint group
    ///
    /// Returns the group-specific override if set, otherwise the global default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockwatt::ExplorerConfigBuilder;
    /// use std::time::Duration;
    ///
    /// let config = ExplorerConfigBuilder::new()
    ///     .min_request_interval(Duration::from_secs(1))
    ///     .group_interval("rawaddr", Duration::from_secs(10))
    ///     .build();
    ///
    /// assert_eq!(config.get_min_request_interval("rawaddr"), Duration::from_secs(10));
    /// assert_eq!(config.get_min_request_interval("rawblock"), Duration::from_secs(1));
    /// ```
    pub fn get_min_request_interval(&self, group: &str) -> Duration {
        self.group_overrides
            .get(group)
            .copied()
            .unwrap_or(self.min_request_interval)
    }

    /// Set an endpoint-group specific minimum interval
    pub fn set_group_interval(&mut self, group: impl Into<String>, interval: Duration) {
        self.group_overrides.insert(group.into(), interval);
    }

    /// Retry policy for the transport derived from this configuration
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: self.retry_base_delay,
            max_delay: self.retry_max_delay,
        }
    }
}

fn lookup_parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::invalid_value(name, raw.clone(), e.to_string())),
    }
}

fn lookup_millis<F>(lookup: &F, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    lookup_parsed(lookup, name, default_ms).map(Duration::from_millis)
}

fn lookup_url<F>(lookup: &F, name: &'static str, default: Url) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => parse_base_url(&raw).map_err(|e| ConfigError::invalid_value(name, raw, e)),
    }
}

/// Parses a base URL, appending the trailing slash `Url::join` needs to keep
/// the last path segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| e.to_string())
}

/// Builder for [`ExplorerConfig`]
///
/// Provides a fluent API for constructing configurations.
///
/// # Example
///
/// ```rust
/// use blockwatt::ExplorerConfigBuilder;
/// use std::time::Duration;
///
/// let config = ExplorerConfigBuilder::new()
///     .watt_per_byte(4_560)
///     .http_batch_size(10)
///     .http_request_timeout(Duration::from_secs(10))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExplorerConfigBuilder {
    config: ExplorerConfig,
}

impl ExplorerConfigBuilder {
    /// Create a new builder starting from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ExplorerConfig) -> Self {
        Self { config }
    }

    /// Set the explorer base URL
    ///
    /// A trailing slash is added when missing. Unparseable URLs are rejected
    /// with a [`ConfigError`].
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.config.base_url = parse_base_url(url)
            .map_err(|e| ConfigError::invalid_value("EXPLORER_BASE_URL", url, e))?;
        Ok(self)
    }

    /// Set the host serving per-day block listings
    pub fn day_listing_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.config.day_listing_url = parse_base_url(url)
            .map_err(|e| ConfigError::invalid_value("EXPLORER_DAY_LISTING_URL", url, e))?;
        Ok(self)
    }

    /// Set energy per byte, in watts
    pub fn watt_per_byte(mut self, watts: u64) -> Self {
        self.config.watt_per_byte = watts;
        self
    }

    /// Set the maximum number of days a per-day query may cover
    pub fn max_days_back(mut self, days: u64) -> Self {
        self.config.max_days_back = days;
        self
    }

    /// Set the number of explorer calls per wave
    pub fn http_batch_size(mut self, size: usize) -> Self {
        self.config.http_batch_size = size;
        self
    }

    /// Set the cache capacity
    pub fn cache_max_size(mut self, size: usize) -> Self {
        self.config.cache_max_size = size;
        self
    }

    /// Set the default cache TTL
    pub fn cache_default_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_default_ttl = ttl;
        self
    }

    /// Set the wallet page cache TTL
    pub fn wallet_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.wallet_cache_ttl = ttl;
        self
    }

    /// Set the number of transactions per wallet page
    pub fn wallet_page_size(mut self, size: u64) -> Self {
        self.config.wallet_page_size = size;
        self
    }

    /// Set the maximum number of pages fetched for one wallet
    pub fn wallet_max_pages(mut self, pages: u64) -> Self {
        self.config.wallet_max_pages = pages;
        self
    }

    /// Set the per-attempt HTTP timeout
    pub fn http_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_request_timeout = timeout;
        self
    }

    /// Set the global minimum interval between dispatches in one endpoint group
    pub fn min_request_interval(mut self, interval: Duration) -> Self {
        self.config.min_request_interval = interval;
        self
    }

    /// Override the minimum interval for a single endpoint group
    pub fn group_interval(mut self, group: impl Into<String>, interval: Duration) -> Self {
        self.config.set_group_interval(group, interval);
        self
    }

    /// Set total attempts per request
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the first backoff delay
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry_base_delay = delay;
        self
    }

    /// Set the cap on a single backoff delay
    pub fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.config.retry_max_delay = delay;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExplorerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.watt_per_byte, 4_560);
        assert_eq!(config.max_days_back, 3);
        assert_eq!(config.http_batch_size, 5);
        assert_eq!(config.cache_max_size, 1_000);
        assert_eq!(config.cache_default_ttl, Duration::from_secs(86_400));
        assert_eq!(config.wallet_cache_ttl, Duration::from_secs(3_600));
        assert_eq!(config.min_request_interval, Duration::from_secs(1));
        assert_eq!(config.base_url.as_str(), "https://blockchain.info/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ExplorerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.watt_per_byte, WATT_PER_BYTE);
        assert_eq!(config.http_request_timeout, Duration::from_millis(3_000));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ExplorerConfig::from_lookup(lookup_from(&[
            ("WATT_PER_BYTE", "10"),
            ("MAX_DAYS_BACK", "7"),
            ("HTTP_BATCH_SIZE", " 2 "),
            ("MIN_REQUEST_INTERVAL_MS", "250"),
            ("EXPLORER_BASE_URL", "http://localhost:8080/api"),
        ]))
        .unwrap();

        assert_eq!(config.watt_per_byte, 10);
        assert_eq!(config.max_days_back, 7);
        assert_eq!(config.http_batch_size, 2);
        assert_eq!(config.min_request_interval, Duration::from_millis(250));
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_from_lookup_wallet_max_pages() {
        let config = ExplorerConfig::from_lookup(lookup_from(&[("WALLET_MAX_PAGES", "40")])).unwrap();
        assert_eq!(config.wallet_max_pages, 40);
        assert_eq!(ExplorerConfig::default().wallet_max_pages, WALLET_MAX_PAGES);

        let err = ExplorerConfig::from_lookup(lookup_from(&[("WALLET_MAX_PAGES", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "WALLET_MAX_PAGES",
                ..
            }
        ));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = ExplorerConfig::from_lookup(lookup_from(&[("WATT_PER_BYTE", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "WATT_PER_BYTE",
                ..
            }
        ));
    }

    #[test]
    fn test_from_lookup_rejects_zero_batch_size() {
        let err =
            ExplorerConfig::from_lookup(lookup_from(&[("HTTP_BATCH_SIZE", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "HTTP_BATCH_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn test_group_override_precedence() {
        let config = ExplorerConfigBuilder::new()
            .min_request_interval(Duration::from_millis(500))
            .group_interval("blocks", Duration::from_secs(5))
            .build();

        assert_eq!(
            config.get_min_request_interval("blocks"),
            Duration::from_secs(5)
        );
        assert_eq!(
            config.get_min_request_interval("rawtx"),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_builder_base_url_adds_slash() {
        let config = ExplorerConfigBuilder::new()
            .base_url("http://127.0.0.1:1234")
            .unwrap()
            .build();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:1234/");
        assert!(ExplorerConfigBuilder::new().base_url("not a url").is_err());
    }

    #[test]
    fn test_retry_config_from_explorer_config() {
        let config = ExplorerConfigBuilder::new()
            .max_attempts(5)
            .retry_base_delay(Duration::from_millis(10))
            .build();
        let retry = config.retry_config();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.base_delay, Duration::from_millis(10));
    }
}
