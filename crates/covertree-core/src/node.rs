//! Coverage tree node types.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoverageError;

/// Reserved identifier of the root node.
pub const ROOT_ID: &str = "root";

/// Display name of the root node.
pub const ROOT_NAME: &str = "coverage";

/// A repository-supplied annotation describing archival status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRecord {
    /// Identifier of the repository that produced this record.
    pub repository_id: CompactString,

    /// Whether the repository holds an archived copy.
    #[serde(default)]
    pub archived: bool,

    /// URL the record was produced for, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// When the repository last checked this URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl CoverageRecord {
    /// Create a record for a repository.
    pub fn new(repository_id: impl Into<CompactString>, archived: bool) -> Self {
        Self {
            repository_id: repository_id.into(),
            archived,
            url: None,
            checked_at: None,
        }
    }

    /// Attach the URL this record describes.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach the time this record was checked.
    pub fn with_checked_at(mut self, checked_at: DateTime<Utc>) -> Self {
        self.checked_at = Some(checked_at);
        self
    }
}

/// One segment of the URL hierarchy.
///
/// Children are owned exclusively by their parent. A node without children
/// is a leaf. The `num_*` counters are derived and only meaningful after an
/// aggregation pass (see [`crate::aggregate`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable identifier, unique within a tree.
    pub id: CompactString,

    /// Human-readable label (domain or path segment).
    pub name: CompactString,

    /// Child nodes, sorted by name after aggregation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Coverage records attached by repositories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coverage: Vec<CoverageRecord>,

    /// Node-level archived flag.
    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub num_children: u64,

    #[serde(default)]
    pub num_descendants: u64,

    #[serde(default)]
    pub num_descendants_archived: u64,

    #[serde(default)]
    pub num_leaves: u64,

    #[serde(default)]
    pub num_leaves_archived: u64,
}

impl Node {
    /// Create a node with no children and zeroed counters.
    pub fn new(id: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            coverage: Vec::new(),
            archived: false,
            num_children: 0,
            num_descendants: 0,
            num_descendants_archived: 0,
            num_leaves: 0,
            num_leaves_archived: 0,
        }
    }

    /// Create an empty root node.
    pub fn root() -> Self {
        Self::new(ROOT_ID, ROOT_NAME)
    }

    /// Check if this node is the reserved root.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// A node is a leaf when it has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when at least one attached record is archived.
    pub fn is_covered(&self) -> bool {
        self.coverage.iter().any(|c| c.archived)
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Get a direct child by id.
    pub fn child(&self, id: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Get a mutable direct child by id.
    pub fn child_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.id == id)
    }

    /// Find a node by id anywhere in this subtree, including `self`.
    ///
    /// `self` is checked first, so a descendant sharing its id is shadowed.
    /// On a tree root the reserved id [`ROOT_ID`] always resolves to the root
    /// itself; a host literally named `root` is still reachable through
    /// [`Node::child`] or [`Node::find_path_mut`].
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable variant of [`Node::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Return the child with `id`, creating it if it does not exist yet.
    pub fn find_or_create_child(
        &mut self,
        id: impl Into<CompactString>,
        name: impl Into<CompactString>,
    ) -> &mut Node {
        let id = id.into();
        let idx = match self.children.iter().position(|c| c.id == id) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::new(id, name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Find or create the chain of nodes for `segments` below this node.
    ///
    /// Each node's id is the segments up to and including its own, joined
    /// with `/`. Returns the terminal node, or `self` for an empty path.
    pub fn insert_path<S: AsRef<str>>(&mut self, segments: &[S]) -> &mut Node {
        let mut current = self;
        let mut id = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            if !id.is_empty() {
                id.push('/');
            }
            id.push_str(segment);
            current = current.find_or_create_child(id.as_str(), segment);
        }
        current
    }

    /// Insert the node chain for a URL and return its terminal node.
    pub fn insert_url(&mut self, url: &str) -> Result<&mut Node, CoverageError> {
        let segments = url_segments(url)?;
        Ok(self.insert_path(&segments))
    }

    /// Follow `segments` from this node without creating anything.
    pub fn find_path_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut Node> {
        let mut current = self;
        let mut id = String::new();
        for segment in segments {
            if !id.is_empty() {
                id.push('/');
            }
            id.push_str(segment.as_ref());
            current = current.child_mut(&id)?;
        }
        Some(current)
    }

    /// Attach a coverage record to this node.
    pub fn add_coverage(&mut self, record: CoverageRecord) {
        self.coverage.push(record);
    }

    /// Attach a record, replacing any earlier record from the same repository.
    ///
    /// An earlier record with the same archived flag and url is kept as is,
    /// including its `checked_at`, so unchanged input leaves the node intact.
    pub fn set_coverage(&mut self, record: CoverageRecord) {
        match self
            .coverage
            .iter_mut()
            .find(|c| c.repository_id == record.repository_id)
        {
            Some(existing)
                if existing.archived == record.archived && existing.url == record.url => {}
            Some(existing) => *existing = record,
            None => self.coverage.push(record),
        }
    }

    /// Visit every node in this subtree, parent before children.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&Node),
    {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Visit every node mutably, parent before children.
    ///
    /// The visitor may reorder or update the node it receives; children are
    /// iterated after the visitor returns.
    pub fn walk_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Node),
    {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Stably sort direct children by case-normalized name, then id.
    pub fn sort_children(&mut self) {
        self.children.sort_by(compare_nodes);
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Length of the longest path from this node to a leaf.
    pub fn depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

/// Split a URL into tree segments: lower-cased host, then non-empty path
/// segments. Query and fragment are dropped.
pub fn url_segments(raw: &str) -> Result<Vec<String>, CoverageError> {
    let parsed = Url::parse(raw).map_err(|e| CoverageError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| CoverageError::InvalidUrl {
        url: raw.to_string(),
        message: "missing host".to_string(),
    })?;

    let mut segments = vec![host.to_lowercase()];
    if let Some(path) = parsed.path_segments() {
        segments.extend(path.filter(|s| !s.is_empty()).map(str::to_string));
    }
    Ok(segments)
}
