//! JSON snapshot of a coverage tree between runs.

use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::node::Node;

/// Default file name of the cache artifact.
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Reads and writes the tree cache at a fixed path.
///
/// Writers are not serialized; concurrent saves to the same path race and
/// the last one wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the artifact exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the cached tree.
    ///
    /// Returns `Ok(None)` when no cache has been written yet. A file that
    /// exists but does not decode is an error.
    pub fn load(&self) -> Result<Option<Node>, CacheError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cached tree");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        let tree = serde_json::from_slice(&data).map_err(|source| CacheError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), "loaded cached tree");
        Ok(Some(tree))
    }

    /// Replace `into` with the cached tree.
    ///
    /// `into` is left untouched when there is no cache or decoding fails.
    /// Returns whether a cached tree was loaded.
    pub fn load_into(&self, into: &mut Node) -> Result<bool, CacheError> {
        match self.load()? {
            Some(tree) => {
                *into = tree;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the tree as indented JSON, overwriting any previous artifact.
    pub fn save(&self, tree: &Node) -> Result<(), CacheError> {
        let data =
            serde_json::to_vec_pretty(tree).map_err(|source| CacheError::Encode { source })?;
        std::fs::write(&self.path, data).map_err(|e| CacheError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), nodes = tree.node_count(), "saved tree cache");
        Ok(())
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}
