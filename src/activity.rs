// Per-repository activity loading for project cards.
// Each repository loads independently; one failure never hides another card's data.

use std::fmt;
use std::str::FromStr;

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::error::{FolioError, Result};
use crate::github::{Branch, CachedFetcher, Commit};

const DEFAULT_BRANCH: &str = "main";

/// Repository coordinates, written `owner/repo[@branch]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

impl FromStr for RepoRef {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let (path, branch) = match s.split_once('@') {
            Some((path, branch)) => (path, branch),
            None => (s, DEFAULT_BRANCH),
        };
        let valid = |part: &str| !part.is_empty() && !part.contains('/');
        match path.split_once('/') {
            Some((owner, repo)) if valid(owner) && valid(repo) && !branch.is_empty() => {
                Ok(Self::new(owner, repo, branch))
            }
            _ => Err(FolioError::Other(format!(
                "invalid repository '{s}', expected owner/repo[@branch]"
            ))),
        }
    }
}

/// What a project card shows: the branch head and recent history.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectActivity {
    pub repo: RepoRef,
    pub head: Branch,
    pub head_commit: Commit,
    pub recent_commits: Vec<Commit>,
}

/// Final state of one project card.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum CardState {
    Loaded(Box<ProjectActivity>),
    Error(String),
}

impl CardState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CardState::Loaded(_))
    }

    pub fn data(&self) -> Option<&ProjectActivity> {
        match self {
            CardState::Loaded(activity) => Some(&**activity),
            CardState::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CardState::Error(message) => Some(message),
            CardState::Loaded(_) => None,
        }
    }
}

/// Load branch head, head commit detail and recent commits for one repository.
pub async fn load_project(
    fetcher: &CachedFetcher,
    repo: &RepoRef,
    per_page: u32,
) -> Result<ProjectActivity> {
    let head: Branch = fetcher
        .branch_info(&repo.owner, &repo.repo, &repo.branch)
        .await?;
    let head_commit: Commit = fetcher.commit_details(&head.commit.url).await?;
    let recent_commits: Vec<Commit> = fetcher
        .commits_list(&repo.owner, &repo.repo, per_page)
        .await?;

    Ok(ProjectActivity {
        repo: repo.clone(),
        head,
        head_commit,
        recent_commits,
    })
}

/// Load every repository concurrently, each into its own card state.
pub async fn load_activity(
    fetcher: &CachedFetcher,
    repos: &[RepoRef],
    per_page: u32,
) -> Vec<(RepoRef, CardState)> {
    let loads = repos.iter().map(|repo| async move {
        let state = match load_project(fetcher, repo, per_page).await {
            Ok(activity) => CardState::Loaded(Box::new(activity)),
            Err(e) => {
                warn!(repo = %repo, error = %e, "project activity unavailable");
                CardState::Error(e.to_string())
            }
        };
        (repo.clone(), state)
    });

    join_all(loads).await
}
