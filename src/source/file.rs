//! File-backed snapshot source
//!
//! Payloads are stored under `<root>/<source>/<subject>.json`, where the
//! subject is slugified. Useful for offline runs and recorded fixtures.

use crate::error::{EstimateError, Result};
use crate::source::{slugify, SnapshotSource, SourceRequest};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads payloads recorded on disk
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    root: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the payload for a request
    pub fn path_for(&self, request: &SourceRequest) -> PathBuf {
        self.root
            .join(&request.source)
            .join(format!("{}.json", slugify(&request.subject)))
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn fetch(&self, request: &SourceRequest) -> Result<String> {
        let path = self.path_for(request);
        debug!("Reading {} snapshot from {}", request.source, path.display());

        std::fs::read_to_string(&path).map_err(|e| {
            EstimateError::unavailable(
                request.source.clone(),
                format!("could not read {}: {}", path.display(), e),
            )
            .into()
        })
    }
}
