// GitHub API response types.
// Typed views over the branch, commit list and commit detail payloads.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// GitHub user account attached to a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// A repository branch, as returned by `/repos/{owner}/{repo}/branches/{branch}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub protected: bool,
}

/// Pointer to a commit: its sha and API detail URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    pub url: String,
}

/// A commit from the commit list or commit detail endpoints.
///
/// `stats` and `files` are only present on the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub url: String,
    pub html_url: Option<String>,
    pub commit: GitCommit,
    pub author: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<CommitStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<CommitFile>,
}

impl Commit {
    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    /// Abbreviated sha, as shown in most git UIs.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }
}

/// Git-level commit data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCommit {
    pub message: String,
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
}

/// Author or committer signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Line counts for a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// A file touched by a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
}

/// How a commit changed a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// Rate limit information from response headers.
///
/// Fields are `None` when the header was absent or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Reset time, epoch seconds.
    pub reset: Option<u64>,
}

impl RateLimit {
    /// Read the `x-ratelimit-*` headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Self {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
            reset: read("x-ratelimit-reset"),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Human-readable reset time, or `unknown`.
    pub fn reset_display(&self) -> String {
        self.reset_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_branch_deserializes() {
        let branch: Branch = serde_json::from_value(json!({
            "name": "main",
            "commit": {
                "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
                "url": "https://api.github.com/repos/octocat/Hello-World/commits/6dcb09b"
            },
            "protected": true,
            "_links": {}
        }))
        .unwrap();
        assert_eq!(branch.name, "main");
        assert!(branch.protected);
        assert!(branch.commit.url.ends_with("/commits/6dcb09b"));
    }

    #[test]
    fn test_commit_detail_deserializes() {
        let commit: Commit = serde_json::from_value(json!({
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "url": "https://api.github.com/repos/octocat/Hello-World/commits/6dcb09b",
            "html_url": "https://github.com/octocat/Hello-World/commit/6dcb09b",
            "commit": {
                "message": "Fix all the bugs\n\nLonger body",
                "author": {"name": "Monalisa", "email": "m@github.com", "date": "2011-04-14T16:00:49Z"},
                "committer": null
            },
            "author": {"login": "octocat", "avatar_url": null, "html_url": null},
            "stats": {"additions": 104, "deletions": 4, "total": 108},
            "files": [
                {"filename": "file1.txt", "status": "added", "additions": 103, "deletions": 21, "changes": 124},
                {"filename": "weird", "status": "something-new"}
            ]
        }))
        .unwrap();

        assert_eq!(commit.headline(), "Fix all the bugs");
        assert_eq!(commit.short_sha(), "6dcb09b");
        assert_eq!(commit.stats.unwrap().total, 108);
        assert_eq!(commit.files[0].status, FileStatus::Added);
        assert_eq!(commit.files[1].status, FileStatus::Unknown);
        assert_eq!(
            commit.authored_at().unwrap().to_rfc3339(),
            "2011-04-14T16:00:49+00:00"
        );
    }

    #[test]
    fn test_commit_list_item_has_no_stats() {
        let commit: Commit = serde_json::from_value(json!({
            "sha": "abc",
            "url": "u",
            "commit": {"message": "", "author": null},
            "author": null
        }))
        .unwrap();
        assert!(commit.stats.is_none());
        assert!(commit.files.is_empty());
        assert_eq!(commit.headline(), "");
        assert_eq!(commit.short_sha(), "abc");
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let rate = RateLimit::from_headers(&headers);
        assert_eq!(rate.limit, Some(60));
        assert!(rate.is_exhausted());
        assert_eq!(rate.reset_display(), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_missing_headers_are_not_exhausted() {
        let rate = RateLimit::from_headers(&HeaderMap::new());
        assert!(!rate.is_exhausted());
        assert_eq!(rate.reset_display(), "unknown");
    }
}
