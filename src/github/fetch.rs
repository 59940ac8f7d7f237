// Cache-or-network retrieval for GitHub API resources.
// Cache failures stay silent; network and upstream failures are classified and returned.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::cache::{CacheStore, DEFAULT_TTL};
use crate::error::{FolioError, Result};

use super::client::{GITHUB_API_BASE, HttpTransport, RawResponse};
use super::types::RateLimit;

/// Fetches JSON resources through a [`CacheStore`].
///
/// Concurrent requests for the same uncached URL are not coalesced: each
/// issues its own GET and the last write wins.
pub struct CachedFetcher {
    cache: CacheStore,
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    default_ttl: Duration,
    rate_limit: Mutex<RateLimit>,
}

impl CachedFetcher {
    pub fn new(cache: CacheStore, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            cache,
            transport,
            api_base: GITHUB_API_BASE.to_string(),
            default_ttl: DEFAULT_TTL,
            rate_limit: Mutex::new(RateLimit::default()),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Rate limit headers from the most recent network response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|rate| *rate)
            .unwrap_or_default()
    }

    /// Fetch `url` with the default TTL.
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        self.fetch_with_cache(url, self.default_ttl).await
    }

    /// Return the cached payload for `url`, or GET it and cache it for `ttl`.
    pub async fn fetch_with_cache(&self, url: &str, ttl: Duration) -> Result<Value> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached);
        }

        match self.fetch_fresh(url, ttl).await {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(url, error = %e, "GitHub API fetch error");
                Err(e)
            }
        }
    }

    /// Like [`fetch_with_cache`](Self::fetch_with_cache), decoding into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str, ttl: Duration) -> Result<T> {
        let data = self.fetch_with_cache(url, ttl).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn fetch_fresh(&self, url: &str, ttl: Duration) -> Result<Value> {
        debug!(url, "fetching from network");
        let response = self.transport.get(url).await?;

        let rate = RateLimit::from_headers(&response.headers);
        if let Ok(mut last) = self.rate_limit.lock() {
            *last = rate;
        }

        if !response.status.is_success() {
            return Err(classify_failure(&response, &rate));
        }

        let data: Value = serde_json::from_str(&response.body)?;
        self.cache.set(url, &data, ttl);
        Ok(data)
    }
}

/// Turn a non-2xx response into a rate-limit or generic upstream error.
pub fn classify_failure(response: &RawResponse, rate: &RateLimit) -> FolioError {
    let limited = matches!(
        response.status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    if limited && rate.is_exhausted() {
        FolioError::RateLimited {
            reset_at: rate.reset_display(),
        }
    } else {
        FolioError::Upstream {
            status: response.status,
            status_text: response.status_text().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(response: RawResponse) -> FolioError {
        let rate = RateLimit::from_headers(&response.headers);
        classify_failure(&response, &rate)
    }

    #[test]
    fn test_forbidden_with_zero_remaining_is_rate_limited() {
        let err = classify(
            RawResponse::new(StatusCode::FORBIDDEN, "")
                .with_header("X-RateLimit-Remaining", "0")
                .with_header("X-RateLimit-Reset", "1700000000"),
        );
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("2023-11-14 22:13:20"));
    }

    #[test]
    fn test_forbidden_with_quota_left_is_upstream() {
        let err = classify(
            RawResponse::new(StatusCode::FORBIDDEN, "")
                .with_header("X-RateLimit-Remaining", "12")
                .with_header("X-RateLimit-Reset", "1700000000"),
        );
        assert!(matches!(
            err,
            FolioError::Upstream { status: StatusCode::FORBIDDEN, .. }
        ));
        assert_eq!(err.to_string(), "GitHub API error: 403 Forbidden");
    }

    #[test]
    fn test_forbidden_without_headers_is_upstream() {
        let err = classify(RawResponse::new(StatusCode::FORBIDDEN, ""));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let err = classify(
            RawResponse::new(StatusCode::TOO_MANY_REQUESTS, "")
                .with_header("X-RateLimit-Remaining", "0"),
        );
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_not_found_is_upstream() {
        let err = classify(
            RawResponse::new(StatusCode::NOT_FOUND, "{\"message\":\"Not Found\"}")
                .with_header("X-RateLimit-Remaining", "0"),
        );
        assert_eq!(err.to_string(), "GitHub API error: 404 Not Found");
    }
}
