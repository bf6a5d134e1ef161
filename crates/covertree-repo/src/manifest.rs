//! Repository backed by a JSON manifest file.
//!
//! A manifest looks like:
//!
//! ```json
//! {
//!   "id": "eot",
//!   "name": "End of Term crawl",
//!   "description": "Seeds from the 2016 crawl",
//!   "urls": [
//!     { "url": "https://www.epa.gov/climate", "archived": true }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use covertree_core::{Node, RepositoryError};

use crate::repository::{
    CoverageRepository, RepositoryInfo, UrlEntry, attach_coverage, insert_entries,
};
use crate::source::Source;

/// On-disk manifest format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub urls: Vec<UrlEntry>,
}

/// A repository that re-reads its manifest on every `add_urls` call.
#[derive(Debug)]
pub struct ManifestRepository {
    path: PathBuf,
    id: String,
    name: String,
    description: String,
    entries: RwLock<Vec<UrlEntry>>,
}

impl ManifestRepository {
    /// Open a manifest, reading it once to learn the repository id.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let fallback_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "manifest".to_string());
        let manifest = read_manifest(&fallback_id, &path)?;

        Ok(Self {
            name: manifest.name.unwrap_or_else(|| manifest.id.clone()),
            id: manifest.id,
            description: manifest.description,
            entries: RwLock::new(manifest.urls),
            path,
        })
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Vec<UrlEntry> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn replace_entries(&self, urls: Vec<UrlEntry>) {
        match self.entries.write() {
            Ok(mut entries) => *entries = urls,
            Err(poisoned) => *poisoned.into_inner() = urls,
        }
    }
}

impl CoverageRepository for ManifestRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn info(&self) -> RepositoryInfo {
        RepositoryInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            url_count: Some(self.entries().len()),
        }
    }

    fn add_urls(&self, tree: &mut Node, sources: &[Source]) -> Result<(), RepositoryError> {
        let manifest = read_manifest(&self.id, &self.path)?;
        if manifest.id != self.id {
            tracing::warn!(
                repository = %self.id,
                found = %manifest.id,
                "manifest id changed on disk, keeping original id"
            );
        }
        insert_entries(&self.id, tree, &manifest.urls, sources)?;
        self.replace_entries(manifest.urls);
        Ok(())
    }

    fn add_coverage(&self, tree: &mut Node) {
        attach_coverage(&self.id, tree, &self.entries());
    }
}

fn read_manifest(id: &str, path: &Path) -> Result<Manifest, RepositoryError> {
    let data = std::fs::read(path).map_err(|source| RepositoryError::Io {
        id: id.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| RepositoryError::Malformed {
        id: id.to_string(),
        path: path.to_path_buf(),
        source,
    })
}
