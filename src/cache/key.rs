// Cache key derivation.
// Keys are `{namespace}{version}_{base64(request id)}`, so a sweep can find its own
// entries by prefix and bumping the version orphans every older entry.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// Default namespace prefix for cache keys.
pub const DEFAULT_NAMESPACE: &str = "github_cache_";

/// Default schema version. Bump it whenever the cached payload shape changes.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0";

/// Namespace and schema version used to derive storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    namespace: String,
    version: String,
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, DEFAULT_SCHEMA_VERSION)
    }
}

impl KeyScheme {
    pub fn new(namespace: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            version: version.into(),
        }
    }

    /// Prefix shared by every key in the namespace, across all versions.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Prefix shared by every key of the current schema version.
    pub fn versioned_prefix(&self) -> String {
        format!("{}{}_", self.namespace, self.version)
    }

    /// Derive the storage key for a request identifier.
    ///
    /// The URL-safe alphabet keeps keys usable as file names.
    pub fn derive(&self, request_id: &str) -> String {
        format!("{}{}", self.versioned_prefix(), URL_SAFE.encode(request_id))
    }

    /// Recover the request identifier from a key of the current version.
    pub fn decode(&self, key: &str) -> Option<String> {
        let encoded = key.strip_prefix(&self.versioned_prefix())?;
        let bytes = URL_SAFE.decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCH_URL: &str = "https://api.github.com/repos/octocat/hello/branches/main";

    #[test]
    fn test_derive_is_deterministic() {
        let scheme = KeyScheme::default();
        let key = scheme.derive(BRANCH_URL);
        assert_eq!(key, scheme.derive(BRANCH_URL));
        assert!(key.starts_with("github_cache_1.0_"));
        assert!(!key.contains('/'));
    }

    #[test]
    fn test_distinct_ids_distinct_keys() {
        let scheme = KeyScheme::default();
        assert_ne!(
            scheme.derive("https://api.github.com/repos/a/b/commits?per_page=7"),
            scheme.derive("https://api.github.com/repos/a/b/commits?per_page=8"),
        );
    }

    #[test]
    fn test_decode_reverses_derive() {
        let scheme = KeyScheme::default();
        let key = scheme.derive(BRANCH_URL);
        assert_eq!(scheme.decode(&key).as_deref(), Some(BRANCH_URL));
        assert_eq!(scheme.decode("unrelated"), None);
    }

    #[test]
    fn test_version_bump_changes_key() {
        let v1 = KeyScheme::new(DEFAULT_NAMESPACE, "1.0");
        let v2 = KeyScheme::new(DEFAULT_NAMESPACE, "2.0");
        let old = v1.derive(BRANCH_URL);
        assert_ne!(old, v2.derive(BRANCH_URL));
        assert_eq!(v2.decode(&old), None);
        assert!(old.starts_with(v2.namespace()));
    }
}
