// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The innermost service of the transport stack: one HTTP GET per call.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use reqwest::{header::RETRY_AFTER, Client};
use url::Url;

use super::{ExplorerRequest, HttpResponse};
use crate::errors::TransportError;

/// Issues GET requests against the explorer and decodes JSON bodies.
///
/// Relative paths are joined onto the base URL; absolute URLs (the day
/// listing lives on its own host) are requested verbatim. Non-2xx responses
/// become [`TransportError::Status`] carrying the `Retry-After` header so the
/// retry layer can honour it.
#[derive(Clone, Debug)]
pub struct HttpService {
    client: Client,
    base_url: Arc<Url>,
}

impl HttpService {
    /// Creates a service with a per-request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Client { source })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: Arc::new(base_url),
        }
    }

    /// The base URL relative paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path into the URL that will be fetched.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        resolve_url(&self.base_url, path)
    }
}

pub(crate) fn resolve_url(base: &Url, path: &str) -> Result<Url, TransportError> {
    if let Ok(url) = Url::parse(path) {
        if url.has_host() {
            return Ok(url);
        }
    }

    base.join(path.trim_start_matches('/'))
        .map_err(|e| TransportError::InvalidUrl {
            path: path.to_string(),
            details: e.to_string(),
        })
}

fn map_reqwest_error(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() || error.is_request() || error.is_body() || error.is_decode() {
        // A reset while streaming the body surfaces as a body or decode error
        TransportError::connection(url, error)
    } else {
        TransportError::request(url, error)
    }
}

async fn execute(client: Client, url: Url) -> Result<HttpResponse, TransportError> {
    let url_str = url.to_string();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_reqwest_error(&url_str, e))?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        return Err(TransportError::Status {
            url: url_str,
            status,
            retry_after,
        });
    }

    let headers = response.headers().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_reqwest_error(&url_str, e))?;
    let body = serde_json::from_slice(&bytes).map_err(|source| TransportError::Decode {
        url: url_str,
        source,
    })?;

    Ok(HttpResponse {
        body,
        headers,
        status,
    })
}

impl tower::Service<ExplorerRequest> for HttpService {
    type Response = HttpResponse;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ExplorerRequest) -> Self::Future {
        let client = self.client.clone();
        let url = self.resolve(request.path());

        Box::pin(async move { execute(client, url?).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    fn base() -> Url {
        Url::parse("https://blockchain.info/").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = resolve_url(&base(), "rawblock/abc?format=json").unwrap();
        assert_eq!(url.as_str(), "https://blockchain.info/rawblock/abc?format=json");

        let url = resolve_url(&base(), "/rawaddr/1xyz?offset=50").unwrap();
        assert_eq!(url.as_str(), "https://blockchain.info/rawaddr/1xyz?offset=50");
    }

    #[test]
    fn test_resolve_absolute_url_verbatim() {
        let url = resolve_url(&base(), "https://other.example/blocks/0?format=json").unwrap();
        assert_eq!(url.host_str(), Some("other.example"));
    }

    #[tokio::test]
    async fn test_success_decodes_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rawtx/abc")
            .match_query(mockito::Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"hash":"abc","size":250,"time":1700000000}"#)
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let service = HttpService::new(base, Duration::from_secs(3)).unwrap();
        let response = service
            .oneshot(ExplorerRequest::new("rawtx/abc?format=json"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["size"], 250);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_carries_retry_after() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rawblock/abc")
            .with_status(429)
            .with_header("retry-after", "2")
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let service = HttpService::new(base, Duration::from_secs(3)).unwrap();
        let err = service
            .oneshot(ExplorerRequest::new("rawblock/abc"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert_eq!(err.retry_after(), Some("2"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rawtx/abc")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let service = HttpService::new(base, Duration::from_secs(3)).unwrap();
        let err = service
            .oneshot(ExplorerRequest::new("rawtx/abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Decode { .. }));
        assert!(!err.is_retryable());
    }
}
