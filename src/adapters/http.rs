//! HTTP transports: reqwest for real traffic, an in-memory stub for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{HttpClient, HttpError};

/// reqwest-backed client
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_json(&self, url: &Url, timeout: Duration) -> Result<Value, HttpError> {
        debug!(host = url.host_str().unwrap_or(""), path = url.path(), "GET");

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(timeout)
                } else {
                    HttpError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), path = url.path(), "Non-success status");
            return Err(HttpError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

struct StubRoute {
    fragment: String,
    response: Result<Value, HttpError>,
    delay: Option<Duration>,
}

/// In-memory [`HttpClient`] answering by URL substring.
///
/// Routes are matched in registration order against the full URL. Unmatched
/// requests fail with HTTP 404, so a stub with no routes behaves like an
/// unreachable provider.
#[derive(Default)]
pub struct StubHttpClient {
    routes: Vec<StubRoute>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `fragment` with `body`
    pub fn respond(mut self, fragment: impl Into<String>, body: Value) -> Self {
        self.routes.push(StubRoute {
            fragment: fragment.into(),
            response: Ok(body),
            delay: None,
        });
        self
    }

    /// Answer URLs containing `fragment` with `body` after `delay`
    pub fn respond_after(mut self, fragment: impl Into<String>, body: Value, delay: Duration) -> Self {
        self.routes.push(StubRoute {
            fragment: fragment.into(),
            response: Ok(body),
            delay: Some(delay),
        });
        self
    }

    /// Fail URLs containing `fragment` with `error`
    pub fn fail(mut self, fragment: impl Into<String>, error: HttpError) -> Self {
        self.routes.push(StubRoute {
            fragment: fragment.into(),
            response: Err(error),
            delay: None,
        });
        self
    }

    /// Number of requests served, including failures
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every requested URL in order
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get_json(&self, url: &Url, _timeout: Duration) -> Result<Value, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = url.to_string();
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(raw.clone());
        }

        let Some(route) = self.routes.iter().find(|r| raw.contains(&r.fragment)) else {
            return Err(HttpError::Status(404));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        route.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_stub_matches_by_fragment() {
        let stub = StubHttpClient::new()
            .respond("/search/track", json!({"data": [1]}))
            .fail("/search/album", HttpError::Timeout(Duration::from_secs(10)));

        let url = Url::parse("https://api.deezer.com/search/track?q=x").unwrap();
        assert_eq!(stub.get_json(&url, Duration::from_secs(1)).await.unwrap(), json!({"data": [1]}));

        let url = Url::parse("https://api.deezer.com/search/album?q=x").unwrap();
        assert!(matches!(
            stub.get_json(&url, Duration::from_secs(1)).await,
            Err(HttpError::Timeout(_))
        ));

        let url = Url::parse("https://api.deezer.com/other").unwrap();
        assert_eq!(
            stub.get_json(&url, Duration::from_secs(1)).await,
            Err(HttpError::Status(404))
        );
        assert_eq!(stub.calls(), 3);
        assert_eq!(stub.requested().len(), 3);
    }
}
