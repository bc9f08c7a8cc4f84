//! Provider clients for external content sources.
//!
//! Every client goes through the [`HttpClient`] seam and a [`CachedFetcher`]:
//! the request URL is the cache key, fresh entries skip the network, and
//! failures surface as [`ProviderError`] for the mood entry points to turn
//! into fallback data.

pub mod deezer;
pub mod gamezop;
pub mod http;
pub mod puzzle;
pub mod rawg;
pub mod tmdb;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ConfigError;
use crate::core::TtlCache;

// Re-export the provider clients
pub use deezer::{DeezerClient, DeezerConfig, MusicCategory};
pub use gamezop::{GamezopClient, GamezopConfig};
pub use http::{ReqwestHttpClient, StubHttpClient};
pub use puzzle::PuzzleCatalog;
pub use rawg::{GameDetails, RawgClient, RawgConfig};
pub use tmdb::{MovieDetails, TmdbClient, TmdbConfig, TrendingWindow};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level failure from an [`HttpClient`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid JSON body: {0}")]
    Decode(String),
}

/// Error from a provider client
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request to {endpoint} failed: {source}")]
    Http {
        provider: &'static str,
        endpoint: String,
        #[source]
        source: HttpError,
    },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} has no item with id {id}")]
    NotFound { provider: &'static str, id: String },
}

/// Minimal async GET-JSON seam, mocked in tests
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and parse the body as JSON, failing on non-2xx status
    async fn get_json(&self, url: &Url, timeout: Duration) -> Result<Value, HttpError>;
}

/// Parse and validate a configured base URL
pub(crate) fn parse_base_url(provider: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        provider,
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Deserialize a JSON payload into a provider response type
pub(crate) fn decode<T: DeserializeOwned>(
    provider: &'static str,
    value: Value,
) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}

/// Cached GET-JSON against one provider base URL
pub struct CachedFetcher {
    provider: &'static str,
    http: Arc<dyn HttpClient>,
    base_url: Url,
    timeout: Duration,
    cache: TtlCache<Value>,
}

impl CachedFetcher {
    pub fn new(
        provider: &'static str,
        http: Arc<dyn HttpClient>,
        base_url: Url,
        timeout: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            http,
            base_url,
            timeout,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Build `{base}{endpoint}?{params}`
    pub fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, ProviderError> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint);
        if params.is_empty() {
            return Ok(Url::parse(&raw)?);
        }
        Ok(Url::parse_with_params(
            &raw,
            params.iter().map(|(k, v)| (*k, v.as_str())),
        )?)
    }

    /// Fetch JSON, serving a fresh cached copy keyed by the full URL
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let url = self.url(endpoint, params)?;
        let key = url.to_string();

        if let Some(cached) = self.cache.get(&key) {
            debug!(provider = self.provider, endpoint, "Returning cached data");
            return Ok(cached);
        }

        let data = self
            .http
            .get_json(&url, self.timeout)
            .await
            .map_err(|source| ProviderError::Http {
                provider: self.provider,
                endpoint: endpoint.to_string(),
                source,
            })?;

        self.cache.insert(key, data.clone());
        Ok(data)
    }

    /// Fetch and deserialize
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let value = self.fetch(endpoint, params).await?;
        decode(self.provider, value)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &TtlCache<Value> {
        &self.cache
    }
}

/// First non-empty string among the candidates
pub(crate) fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
