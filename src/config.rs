// Runtime configuration.
// Defaults suit anonymous use against the public GitHub API; environment
// variables override individual fields.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use tracing::warn;

use crate::cache::{DEFAULT_TTL, KeyScheme};
use crate::cache::key::{DEFAULT_NAMESPACE, DEFAULT_SCHEMA_VERSION};
use crate::github::DEFAULT_COMMITS_PER_PAGE;
use crate::github::client::GITHUB_API_BASE;

/// Typical browser local-storage quota.
pub const DEFAULT_MAX_STORE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub token: Option<String>,
    pub default_ttl: Duration,
    pub namespace: String,
    pub schema_version: String,
    /// Directory for the file-backed store; `None` if no cache dir is known.
    pub cache_dir: Option<PathBuf>,
    pub max_store_bytes: usize,
    pub commits_per_page: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
            default_ttl: DEFAULT_TTL,
            namespace: DEFAULT_NAMESPACE.to_string(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            cache_dir: default_cache_dir(),
            max_store_bytes: DEFAULT_MAX_STORE_BYTES,
            commits_per_page: DEFAULT_COMMITS_PER_PAGE,
        }
    }
}

impl Config {
    /// Build from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup("GHFOLIO_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        config.token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());
        if let Some(secs) = parse_var::<u64>(&lookup, "GHFOLIO_TTL_SECS") {
            config.default_ttl = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("GHFOLIO_CACHE_DIR") {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(bytes) = parse_var::<usize>(&lookup, "GHFOLIO_MAX_BYTES") {
            config.max_store_bytes = bytes;
        }

        config
    }

    pub fn key_scheme(&self) -> KeyScheme {
        KeyScheme::new(&self.namespace, &self.schema_version)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

/// Platform cache directory for stored entries (e.g. ~/.cache/ghfolio/entries).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghfolio").map(|dirs| dirs.cache_dir().join("entries"))
}
