//! Coverage tree generation from selected repositories.

use serde::{Deserialize, Serialize};

use covertree_core::{
    AggregationMode, CacheStore, CoverageConfig, CoverageError, Node, aggregate,
};
use covertree_repo::{RepositoryRef, RepositoryRegistry, Source};

use crate::rebuild::{InitOutcome, init_tree};

/// Top-level counts projected from an aggregated tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Descendants of the root with an archived coverage record.
    pub archived: u64,
    /// All descendants of the root.
    pub descendants: u64,
}

impl Summary {
    /// Project a summary from an aggregated root.
    pub fn from_root(root: &Node) -> Self {
        Self {
            archived: root.num_descendants_archived,
            descendants: root.num_descendants,
        }
    }
}

/// Builds coverage trees from a fixed set of repositories and source filters.
#[derive(Clone)]
pub struct CoverageGenerator {
    sources: Vec<Source>,
    repos: Vec<RepositoryRef>,
}

impl CoverageGenerator {
    /// Select repositories from `registry` and build one source per pattern.
    ///
    /// Empty `repo_ids` selects every registered repository. Ids with no
    /// registered repository are dropped.
    pub fn new<I, P>(
        registry: &RepositoryRegistry,
        repo_ids: &[I],
        patterns: &[P],
    ) -> Result<Self, CoverageError>
    where
        I: AsRef<str>,
        P: AsRef<str>,
    {
        let sources = Source::from_patterns(patterns.iter().map(|p| p.as_ref().to_string()))?;
        let repos = registry.select(repo_ids);
        tracing::debug!(
            repositories = repos.len(),
            sources = sources.len(),
            "created coverage generator"
        );
        Ok(Self { sources, repos })
    }

    /// Build a generator from configuration.
    pub fn from_config(
        registry: &RepositoryRegistry,
        config: &CoverageConfig,
    ) -> Result<Self, CoverageError> {
        Self::new(registry, &config.repository_ids, &config.source_patterns)
    }

    /// Source filters passed to every repository.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Selected repositories, in order.
    pub fn repositories(&self) -> &[RepositoryRef] {
        &self.repos
    }

    /// Build a fresh tree from the selected repositories.
    ///
    /// The first repository error aborts the build and no tree is returned.
    pub fn tree(&self) -> Result<Node, CoverageError> {
        let mut tree = Node::root();

        for repo in &self.repos {
            tracing::debug!(repository = repo.id(), "adding urls");
            repo.add_urls(&mut tree, &self.sources)?;
            repo.add_coverage(&mut tree);
        }

        aggregate(&mut tree, AggregationMode::CoverageRecords);
        Ok(tree)
    }

    /// Build a tree and project its top-level counts.
    pub fn summary(&self) -> Result<Summary, CoverageError> {
        let tree = self.tree()?;
        Ok(Summary::from_root(&tree))
    }

    /// Full rebuild on top of the cached tree; see [`init_tree`].
    pub fn init_tree(&self, cache: &CacheStore) -> Result<InitOutcome, CoverageError> {
        init_tree(&self.repos, cache)
    }
}

impl std::fmt::Debug for CoverageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageGenerator")
            .field("sources", &self.sources)
            .field("repos", &self.repos.iter().map(|r| r.id()).collect::<Vec<_>>())
            .finish()
    }
}
