// GitHub API HTTP client.
// Defines the network port used by the cached fetcher and its reqwest implementation.

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};

use crate::error::{FolioError, Result};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a response header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Canonical reason phrase for the status, e.g. `Forbidden`.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }
}

/// Network port: issue a GET for an absolute URL.
///
/// Transport failures are returned as errors; non-2xx statuses are not.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}

/// GitHub REST client backed by reqwest.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
}

impl GitHubClient {
    /// Create a client, optionally authenticated with a token.
    ///
    /// Anonymous clients work against public repositories at a lower rate limit.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghfolio/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Network)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for GitHubClient {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_headers() {
        let response = RawResponse::new(StatusCode::FORBIDDEN, "{}")
            .with_header("X-RateLimit-Remaining", "0")
            .with_header("bad header", "x");

        assert_eq!(response.status_text(), "Forbidden");
        assert_eq!(
            response.headers.get("x-ratelimit-remaining").unwrap(),
            "0"
        );
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_client_builds_with_and_without_token() {
        assert!(GitHubClient::new(None).is_ok());
        assert!(GitHubClient::new(Some("ghp_example")).is_ok());
        assert!(GitHubClient::new(Some("bad\ntoken")).is_err());
    }
}
