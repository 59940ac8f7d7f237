// Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ghfolio::cache::{CacheStore, ManualClock};
use ghfolio::github::{CachedFetcher, HttpTransport, RawResponse};
use ghfolio::storage::MemoryStore;
use ghfolio::{FolioError, Result};

/// Transport that answers from canned responses keyed by URL and counts calls.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, RawResponse>>,
    failures: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay` so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(&self, url: &str, response: RawResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Fail `url` at the transport level, as a dropped connection would.
    pub fn fail(&self, url: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failures.lock().unwrap().get(url) {
            return Err(FolioError::Other(message.clone()));
        }
        let response = self.responses.lock().unwrap().get(url).cloned();
        Ok(response.unwrap_or_else(|| {
            RawResponse::new(reqwest::StatusCode::NOT_FOUND, "{\"message\":\"Not Found\"}")
        }))
    }
}

pub struct Harness {
    pub fetcher: CachedFetcher,
    pub transport: Arc<ScriptedTransport>,
    pub backend: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(transport: ScriptedTransport) -> Harness {
    let transport = Arc::new(transport);
    let backend = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = CacheStore::new(backend.clone()).with_clock(clock.clone());
    let fetcher = CachedFetcher::new(cache, transport.clone());

    Harness {
        fetcher,
        transport,
        backend,
        clock,
    }
}

pub fn ok_json(body: serde_json::Value) -> RawResponse {
    RawResponse::new(reqwest::StatusCode::OK, body.to_string())
        .with_header("X-RateLimit-Limit", "60")
        .with_header("X-RateLimit-Remaining", "59")
        .with_header("X-RateLimit-Reset", "1700000000")
}
