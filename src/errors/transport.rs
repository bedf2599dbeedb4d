//! Error types for the rate-limited explorer transport.
//!
//! These errors are produced by the Tower stack in [`crate::transport`] and are
//! propagated unchanged through the data-access layer.

/// HTTP status codes that are considered transient and worth retrying.
pub const RETRYABLE_STATUS_CODES: [u16; 10] = [408, 413, 429, 500, 502, 503, 504, 521, 522, 524];

/// Errors that can occur while talking to the block explorer over HTTP.
///
/// # Examples
///
/// ```rust
/// use blockwatt::TransportError;
///
/// let error = TransportError::Status {
///     url: "https://blockchain.info/rawblock/abc".to_string(),
///     status: 503,
///     retry_after: None,
/// };
/// assert!(error.is_retryable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The explorer answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Full request URL
        url: String,
        /// Response status code
        status: u16,
        /// Raw `Retry-After` header value, if the server sent one
        retry_after: Option<String>,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Full request URL
        url: String,
    },

    /// The connection could not be established or was reset mid-request.
    #[error("Connection to {url} failed")]
    Connection {
        /// Full request URL
        url: String,
        /// The underlying I/O or client error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request failed for a reason that will not go away on retry.
    #[error("Request to {url} failed")]
    Request {
        /// Full request URL
        url: String,
        /// The underlying client error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body was not valid JSON.
    #[error("Failed to decode response body from {url}")]
    Decode {
        /// Full request URL
        url: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The request path could not be turned into a URL.
    #[error("Invalid request URL {path}: {details}")]
    InvalidUrl {
        /// Path as given by the caller
        path: String,
        /// Why the URL could not be built
        details: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client")]
    Client {
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Create a `Connection` error from any error type.
    pub fn connection(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TransportError::Connection {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Create a `Request` error from any error type.
    pub fn request(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TransportError::Request {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the `Retry-After` hint sent with a 429 response.
    ///
    /// Hints on any other status are ignored.
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            TransportError::Status {
                status: 429,
                retry_after,
                ..
            } => retry_after.as_deref(),
            _ => None,
        }
    }

    /// Determines if this error is transient and the request may succeed on retry.
    ///
    /// Retryable:
    /// - Status codes in [`RETRYABLE_STATUS_CODES`]
    /// - Timeouts
    /// - Connection failures (refused, reset)
    ///
    /// Everything else (4xx client errors, malformed bodies, bad URLs) fails fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => RETRYABLE_STATUS_CODES.contains(status),
            TransportError::Timeout { .. } | TransportError::Connection { .. } => true,
            TransportError::Request { .. }
            | TransportError::Decode { .. }
            | TransportError::InvalidUrl { .. }
            | TransportError::Client { .. } => false,
        }
    }
}
