//! Response cache interface and implementations
//!
//! Responses are keyed by the canonical request URL. The file-backed cache
//! is loaded once at startup and written through on every `put`.

use crate::error::{EstimateError, Result};
use crate::source::{SnapshotSource, SourceRequest};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Trait for caching raw responses
pub trait ResponseCache: Send + Sync {
    /// Get a cached response
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a response
    fn put(&self, key: &str, value: String) -> Result<()>;

    /// Flush entries to backing storage, if any
    fn persist(&self) -> Result<()>;

    /// Number of cached responses
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_error(kind: &str) -> EstimateError {
    EstimateError::InternalError {
        message: format!("Failed to acquire cache {} lock", kind),
    }
}

/// In-memory response cache
#[derive(Debug, Default)]
pub struct InMemoryResponseCache {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseCache for InMemoryResponseCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_error("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("write"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| lock_error("read"))?;
        Ok(entries.len())
    }
}

/// Response cache persisted as a JSON object on disk
#[derive(Debug)]
pub struct FileResponseCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileResponseCache {
    /// Load the cache file, starting empty if it does not exist yet
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                EstimateError::unavailable("response cache", format!("{}: {}", path.display(), e))
            })?;
            serde_json::from_str(&raw).map_err(|e| {
                EstimateError::unavailable(
                    "response cache",
                    format!("{} is not a valid cache file: {}", path.display(), e),
                )
            })?
        } else {
            debug!("No cache file at {}, starting empty", path.display());
            BTreeMap::new()
        };

        info!("Loaded {} cached responses from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ResponseCache for FileResponseCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_error("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("write"))?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }

    fn persist(&self) -> Result<()> {
        let entries = self.entries.read().map_err(|_| lock_error("read"))?;
        self.write_entries(&entries)
    }

    fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| lock_error("read"))?;
        Ok(entries.len())
    }
}

/// Snapshot source that consults a response cache before fetching
pub struct CachedSnapshotSource<S> {
    inner: S,
    cache: Arc<dyn ResponseCache>,
}

impl<S: SnapshotSource> CachedSnapshotSource<S> {
    pub fn new(inner: S, cache: Arc<dyn ResponseCache>) -> Self {
        Self { inner, cache }
    }

    /// Get a reference to the response cache
    pub fn cache(&self) -> Arc<dyn ResponseCache> {
        Arc::clone(&self.cache)
    }
}

impl<S: SnapshotSource> SnapshotSource for CachedSnapshotSource<S> {
    fn fetch(&self, request: &SourceRequest) -> Result<String> {
        let key = request.cache_key();

        if let Some(cached) = self.cache.get(&key)? {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let response = self.inner.fetch(request)?;
        self.cache.put(&key, response.clone())?;
        debug!("Cached response for {}", key);

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSnapshotSource;

    fn request() -> SourceRequest {
        SourceRequest::new("tsa-wait-times", "https://example.test/feed", "DCA")
            .param("ap", "DCA")
            .param("output", "json")
    }

    #[test]
    fn test_in_memory_cache() {
        let cache = InMemoryResponseCache::new();
        assert!(cache.is_empty().unwrap());
        assert!(cache.get("k").unwrap().is_none());

        cache.put("k", "v".to_string()).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_file_cache_writes_through_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("responses.json");

        let cache = FileResponseCache::load(&path).unwrap();
        assert!(cache.is_empty().unwrap());
        cache.put("https://example.test/feed?ap=DCA", "{}".to_string()).unwrap();
        assert!(path.exists());

        let reloaded = FileResponseCache::load(&path).unwrap();
        assert_eq!(
            reloaded.get("https://example.test/feed?ap=DCA").unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_file_cache_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileResponseCache::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EstimateError>(),
            Some(EstimateError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_cached_source_fetches_once() {
        let mut inner = MockSnapshotSource::new();
        inner
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(r#"{"WaitTimes": []}"#.to_string()));

        let cache: Arc<dyn ResponseCache> = Arc::new(InMemoryResponseCache::new());
        let source = CachedSnapshotSource::new(inner, cache.clone());

        let first = source.fetch(&request()).unwrap();
        let second = source.fetch(&request()).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len().unwrap(), 1);
        assert!(cache.get(&request().cache_key()).unwrap().is_some());
    }

    #[test]
    fn test_cached_source_does_not_cache_failures() {
        let mut inner = MockSnapshotSource::new();
        inner
            .expect_fetch()
            .times(2)
            .returning(|_| Err(EstimateError::unavailable("tsa-wait-times", "offline").into()));

        let cache: Arc<dyn ResponseCache> = Arc::new(InMemoryResponseCache::new());
        let source = CachedSnapshotSource::new(inner, cache.clone());

        assert!(source.fetch(&request()).is_err());
        assert!(source.fetch(&request()).is_err());
        assert!(cache.is_empty().unwrap());
    }
}
