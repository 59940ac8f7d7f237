// GitHub API module.
// Provides the network port, the cached fetcher and typed endpoint helpers.

pub mod client;
pub mod endpoints;
pub mod fetch;
pub mod types;

pub use client::{GitHubClient, HttpTransport, RawResponse};
pub use endpoints::{COMMIT_DETAIL_TTL_MULTIPLIER, DEFAULT_COMMITS_PER_PAGE, commit_detail_ttl};
pub use fetch::CachedFetcher;
pub use types::*;
