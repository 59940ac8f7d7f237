// GitHub API endpoint functions.
// Maps repository coordinates to canonical URLs and fetches them through the cache.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::Result;

use super::fetch::CachedFetcher;

/// Default number of commits requested per page.
pub const DEFAULT_COMMITS_PER_PAGE: u32 = 7;

/// Commit contents never change once created, so detail lookups live 24x longer.
pub const COMMIT_DETAIL_TTL_MULTIPLIER: u32 = 24;

/// TTL for commit detail lookups, saturating for very large defaults.
pub fn commit_detail_ttl(default_ttl: Duration) -> Duration {
    default_ttl.saturating_mul(COMMIT_DETAIL_TTL_MULTIPLIER)
}

/// URL of a repository branch.
pub fn branch_url(api_base: &str, owner: &str, repo: &str, branch: &str) -> String {
    format!("{api_base}/repos/{owner}/{repo}/branches/{branch}")
}

/// URL of the first page of a repository's commits.
pub fn commits_url(api_base: &str, owner: &str, repo: &str, per_page: u32) -> String {
    format!("{api_base}/repos/{owner}/{repo}/commits?per_page={per_page}")
}

impl CachedFetcher {
    /// Get branch info for a repository.
    ///
    /// Decode into [`Branch`](super::Branch) or keep the raw `serde_json::Value`.
    pub async fn branch_info<T: DeserializeOwned>(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<T> {
        let url = branch_url(self.api_base(), owner, repo, branch);
        self.fetch_as(&url, self.default_ttl()).await
    }

    /// Get the most recent commits for a repository.
    pub async fn commits_list<T: DeserializeOwned>(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<T> {
        let url = commits_url(self.api_base(), owner, repo, per_page);
        self.fetch_as(&url, self.default_ttl()).await
    }

    /// Get detailed commit information from its full API URL.
    pub async fn commit_details<T: DeserializeOwned>(&self, commit_url: &str) -> Result<T> {
        self.fetch_as(commit_url, commit_detail_ttl(self.default_ttl()))
            .await
    }
}
