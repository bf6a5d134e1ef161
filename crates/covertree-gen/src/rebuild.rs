//! Full rebuild of the cached coverage tree.

use covertree_core::{
    AggregationMode, CacheError, CacheStore, CoverageError, Node, RepositoryError, aggregate,
};
use covertree_repo::RepositoryRef;

/// A repository whose `add_urls` failed during a full rebuild.
#[derive(Debug)]
pub struct RepositoryFailure {
    pub repository_id: String,
    pub error: RepositoryError,
}

/// Result of a full rebuild.
///
/// The tree is always returned, even when some repositories failed or the
/// cache could not be written.
#[derive(Debug)]
pub struct InitOutcome {
    pub tree: Node,
    pub failures: Vec<RepositoryFailure>,
    pub save_error: Option<CacheError>,
}

impl InitOutcome {
    /// True when every repository succeeded and the cache was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.save_error.is_none()
    }
}

/// Load the cached tree, merge every repository on top of it, aggregate by
/// node flag and write the cache back.
///
/// Repository failures are logged and collected rather than aborting. A
/// malformed cache is an error; a missing one starts from an empty root.
pub fn init_tree(
    repos: &[RepositoryRef],
    cache: &CacheStore,
) -> Result<InitOutcome, CoverageError> {
    let mut tree = cache.load()?.unwrap_or_else(Node::root);
    let mut failures = Vec::new();

    for repo in repos {
        if let Err(error) = repo.add_urls(&mut tree, &[]) {
            tracing::warn!(repository = repo.id(), %error, "failed to add urls, continuing");
            failures.push(RepositoryFailure {
                repository_id: repo.id().to_string(),
                error,
            });
        }
        repo.add_coverage(&mut tree);
    }

    aggregate(&mut tree, AggregationMode::NodeFlag);

    let save_error = match cache.save(&tree) {
        Ok(()) => None,
        Err(error) => {
            tracing::warn!(path = %cache.path().display(), %error, "failed to write tree cache");
            Some(error)
        }
    };

    Ok(InitOutcome {
        tree,
        failures,
        save_error,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use covertree_repo::StaticRepository;
    use tempfile::TempDir;

    #[test]
    fn test_rebuild_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().join("cache.json"));
        let repos: Vec<RepositoryRef> = vec![
            Arc::new(StaticRepository::new("down").fail_with("timeout")),
            Arc::new(StaticRepository::new("up").with_url("https://a.org/x", true)),
        ];

        let outcome = init_tree(&repos, &cache).unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].repository_id, "down");
        assert!(outcome.save_error.is_none());
        assert_eq!(outcome.tree.num_leaves_archived, 1);
        assert!(cache.exists());
    }

    #[test]
    fn test_rebuild_returns_tree_when_save_fails() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().join("missing").join("cache.json"));
        let repos: Vec<RepositoryRef> =
            vec![Arc::new(StaticRepository::new("up").with_url("https://a.org/x", false))];

        let outcome = init_tree(&repos, &cache).unwrap();
        assert!(outcome.save_error.is_some());
        assert!(!outcome.is_clean());
        assert_eq!(outcome.tree.num_descendants, 2);
    }
}
