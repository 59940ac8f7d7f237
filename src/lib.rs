//! TTL-cached access to GitHub repository activity.
//!
//! Responses are cached in a pluggable key-value medium so that repeated page
//! loads do not burn through the GitHub API rate limit. Cache failures degrade
//! to misses; network and API failures are returned to the caller.

pub mod activity;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod storage;

pub use cache::{CacheStore, DEFAULT_TTL};
pub use config::Config;
pub use error::{FolioError, Result};
pub use github::CachedFetcher;
