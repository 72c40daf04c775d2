//! Raw snapshot retrieval for the remote data sources
//!
//! The wait-time feed and the travel estimate both arrive as text payloads.
//! This module defines the request shape and the `SnapshotSource` seam,
//! along with the file-backed source and the response cache that wrap it.

pub mod cache;
pub mod file;

// Re-export commonly used types
pub use cache::{CachedSnapshotSource, FileResponseCache, InMemoryResponseCache, ResponseCache};
pub use file::FileSnapshotSource;

use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query parameters that carry credentials and never reach cache keys
const CREDENTIAL_PARAMS: &[&str] = &["key", "api_key", "token"];

/// A request for one payload from a named remote source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRequest {
    /// Logical source name, e.g. "tsa-wait-times"
    pub source: String,
    /// Base URL of the endpoint
    pub url: String,
    /// What the payload is about, e.g. an airport shortcode
    pub subject: String,
    pub params: BTreeMap<String, String>,
}

impl SourceRequest {
    pub fn new(
        source: impl Into<String>,
        url: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            subject: subject.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Canonical request URL used as the cache key
    ///
    /// Parameters are sorted by name and credential parameters are left out.
    pub fn cache_key(&self) -> String {
        let query: Vec<String> = self
            .params
            .iter()
            .filter(|(key, _)| !CREDENTIAL_PARAMS.contains(&key.as_str()))
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect();

        if query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, query.join("&"))
        }
    }
}

/// Trait for fetching raw payloads
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the complete payload for a request
    fn fetch(&self, request: &SourceRequest) -> Result<String>;
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    fn fetch(&self, request: &SourceRequest) -> Result<String> {
        (**self).fetch(request)
    }
}

fn encode_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Lower-case, filesystem-safe form of a request subject
pub(crate) fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_sorted_and_encoded() {
        let request = SourceRequest::new("distance-matrix", "https://example.test/json", "x")
            .param("units", "imperial")
            .param("origins", "Washington, DC")
            .param("destinations", "DCA");

        assert_eq!(
            request.cache_key(),
            "https://example.test/json?destinations=DCA&origins=Washington%2C+DC&units=imperial"
        );
    }

    #[test]
    fn test_cache_key_omits_credentials() {
        let request = SourceRequest::new("distance-matrix", "https://example.test/json", "x")
            .param("key", "secret")
            .param("origins", "Home");

        assert!(!request.cache_key().contains("secret"));
        assert_eq!(request.cache_key(), "https://example.test/json?origins=Home");
    }

    #[test]
    fn test_cache_key_without_params() {
        let request = SourceRequest::new("tsa-wait-times", "https://example.test/feed", "DCA");
        assert_eq!(request.cache_key(), "https://example.test/feed");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("DCA"), "dca");
        assert_eq!(slugify("Washington, DC -> DCA"), "washington-dc-dca");
        assert_eq!(slugify("  ..  "), "");
    }
}
