//! In-memory repository backed by a fixed list of URLs.

use covertree_core::{Node, RepositoryError};

use crate::repository::{
    CoverageRepository, RepositoryInfo, UrlEntry, attach_coverage, insert_entries,
};
use crate::source::Source;

/// A repository whose URLs are supplied up front.
#[derive(Debug, Clone)]
pub struct StaticRepository {
    id: String,
    name: String,
    description: String,
    entries: Vec<UrlEntry>,
    failure: Option<String>,
}

impl StaticRepository {
    /// Create an empty repository.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            entries: Vec::new(),
            failure: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a URL and its archived status.
    pub fn with_url(mut self, url: impl Into<String>, archived: bool) -> Self {
        self.entries.push(UrlEntry::new(url, archived));
        self
    }

    /// Add many entries.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = UrlEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Make `add_urls` fail with `message`, as an unreachable backend would.
    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Entries held by this repository.
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }
}

impl CoverageRepository for StaticRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn info(&self) -> RepositoryInfo {
        RepositoryInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            url_count: Some(self.entries.len()),
        }
    }

    fn add_urls(&self, tree: &mut Node, sources: &[Source]) -> Result<(), RepositoryError> {
        if let Some(message) = &self.failure {
            return Err(RepositoryError::unavailable(&self.id, message));
        }
        insert_entries(&self.id, tree, &self.entries, sources)?;
        Ok(())
    }

    fn add_coverage(&self, tree: &mut Node) {
        if self.failure.is_none() {
            attach_coverage(&self.id, tree, &self.entries);
        }
    }
}
