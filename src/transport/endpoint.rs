//! Endpoint groups: the buckets the rate limiter paces requests in.

use std::fmt;

use url::Url;

/// Rate-limiting bucket derived from a request path
///
/// The group is the first path segment once any scheme and host are
/// stripped, so `rawblock/abc?format=json` and
/// `https://blockchain.info/rawblock/def` share the `rawblock` group while
/// `rawtx/...` requests are paced independently.
///
/// # Examples
///
/// ```rust
/// use blockwatt::transport::EndpointGroup;
///
/// assert_eq!(EndpointGroup::from_path("rawblock/abc?format=json").as_str(), "rawblock");
/// assert_eq!(
///     EndpointGroup::from_path("https://blockchain.info/blocks/1700000000000?format=json").as_str(),
///     "blocks"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointGroup(String);

impl EndpointGroup {
    /// Derives the group for a relative path or absolute URL
    pub fn from_path(path: &str) -> Self {
        let path = match Url::parse(path) {
            Ok(url) if url.has_host() => url.path().to_string(),
            _ => path.to_string(),
        };

        let without_query = path.split(['?', '#']).next().unwrap_or_default();
        let segment = without_query
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        Self(segment.to_string())
    }

    /// The group name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
