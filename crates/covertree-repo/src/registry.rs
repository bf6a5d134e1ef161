//! Ordered collection of registered repositories.

use std::sync::Arc;

use compact_str::CompactString;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::repository::{CoverageRepository, RepositoryInfo};

/// Shared handle to a repository.
pub type RepositoryRef = Arc<dyn CoverageRepository>;

/// Repositories keyed by id, in registration order.
#[derive(Default, Clone)]
pub struct RepositoryRegistry {
    repos: IndexMap<CompactString, RepositoryRef>,
}

impl RepositoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository, replacing any earlier one with the same id.
    pub fn register(&mut self, repo: impl CoverageRepository + 'static) -> &mut Self {
        self.register_shared(Arc::new(repo))
    }

    /// Register an already shared repository.
    pub fn register_shared(&mut self, repo: RepositoryRef) -> &mut Self {
        let id = CompactString::from(repo.id());
        if self.repos.contains_key(&id) {
            tracing::warn!(repository = %id, "replaced repository with duplicate id");
        }
        self.repos.insert(id, repo);
        self
    }

    /// Get a repository by id.
    pub fn get(&self, id: &str) -> Option<&RepositoryRef> {
        self.repos.get(id)
    }

    /// Registered ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(CompactString::as_str)
    }

    /// Metadata for every registered repository.
    pub fn infos(&self) -> Vec<RepositoryInfo> {
        self.repos.values().map(|r| r.info()).collect()
    }

    /// All repositories in registration order.
    pub fn all(&self) -> Vec<RepositoryRef> {
        self.repos.values().cloned().collect()
    }

    /// Repositories matching `ids`, in the order requested.
    ///
    /// An empty slice selects everything. Unknown ids are dropped and
    /// repeated ids select once.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Vec<RepositoryRef> {
        if ids.is_empty() {
            return self.all();
        }
        ids.iter()
            .map(AsRef::<str>::as_ref)
            .unique()
            .filter_map(|id| {
                let repo = self.repos.get(id).cloned();
                if repo.is_none() {
                    tracing::debug!(repository = id, "unknown repository id, skipping");
                }
                repo
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

impl std::fmt::Debug for RepositoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
