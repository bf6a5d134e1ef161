//! The repository contract and shared URL-entry helpers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use covertree_core::{CoverageRecord, Node, RepositoryError, url_segments};

use crate::source::{Source, matches_any};

/// Descriptive metadata for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Repository identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Number of URLs known to the repository, if cheap to report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_count: Option<usize>,
}

/// A pluggable data source that knows which URLs exist and which are archived.
pub trait CoverageRepository: Send + Sync {
    /// Stable identifier used for selection and record provenance.
    fn id(&self) -> &str;

    /// Descriptive metadata.
    fn info(&self) -> RepositoryInfo;

    /// Insert nodes for this repository's URLs, restricted to `sources`
    /// when non-empty. Must not duplicate nodes on repeated calls.
    fn add_urls(&self, tree: &mut Node, sources: &[Source]) -> Result<(), RepositoryError>;

    /// Attach coverage records to nodes already present in `tree`.
    fn add_coverage(&self, tree: &mut Node);
}

/// One URL known to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    pub url: String,
    #[serde(default)]
    pub archived: bool,
}

impl UrlEntry {
    pub fn new(url: impl Into<String>, archived: bool) -> Self {
        Self {
            url: url.into(),
            archived,
        }
    }
}

/// Insert every entry matching `sources`. Returns how many were inserted.
pub(crate) fn insert_entries(
    repo_id: &str,
    tree: &mut Node,
    entries: &[UrlEntry],
    sources: &[Source],
) -> Result<usize, RepositoryError> {
    let mut inserted = 0;
    for entry in entries.iter().filter(|e| matches_any(sources, &e.url)) {
        tree.insert_url(&entry.url)
            .map_err(|source| RepositoryError::Tree {
                id: repo_id.to_string(),
                source,
            })?;
        inserted += 1;
    }
    tracing::debug!(repository = repo_id, inserted, "inserted urls");
    Ok(inserted)
}

/// Attach a record for each entry whose node exists in `tree`.
///
/// Entries whose URL is not in the tree (filtered out, or unparseable) are
/// skipped. The node flag is reset from its records, so a repository that
/// no longer reports a URL as archived clears it.
pub(crate) fn attach_coverage(repo_id: &str, tree: &mut Node, entries: &[UrlEntry]) {
    let checked_at = Utc::now();
    let mut attached = 0usize;
    for entry in entries {
        let Ok(segments) = url_segments(&entry.url) else {
            continue;
        };
        let Some(node) = tree.find_path_mut(&segments) else {
            continue;
        };
        node.set_coverage(
            CoverageRecord::new(repo_id, entry.archived)
                .with_url(entry.url.as_str())
                .with_checked_at(checked_at),
        );
        node.archived = node.is_covered();
        attached += 1;
    }
    tracing::debug!(repository = repo_id, attached, "attached coverage");
}
