//! Statistics aggregation over a coverage tree.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::node::Node;

/// Selects which signal marks a node as archived during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// The node-level `archived` flag (full rebuild).
    NodeFlag,
    /// Any archived record in the node's `coverage` list (generator).
    #[default]
    CoverageRecords,
}

impl AggregationMode {
    /// Whether `node` counts as archived under this mode.
    pub fn is_archived(self, node: &Node) -> bool {
        match self {
            AggregationMode::NodeFlag => node.archived,
            AggregationMode::CoverageRecords => node.is_covered(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    descendants: u64,
    descendants_archived: u64,
    leaves: u64,
    leaves_archived: u64,
}

/// Recompute every aggregate counter in the tree and sort all children.
///
/// Counters start from zero on every pass and count proper descendants
/// only, so a node never counts itself.
pub fn aggregate(root: &mut Node, mode: AggregationMode) {
    root.walk_mut(&mut |n: &mut Node| {
        let mut counts = Counts::default();
        for child in &n.children {
            child.walk(&mut |d: &Node| {
                let archived = mode.is_archived(d);
                counts.descendants += 1;
                if archived {
                    counts.descendants_archived += 1;
                }
                if d.is_leaf() {
                    counts.leaves += 1;
                    if archived {
                        counts.leaves_archived += 1;
                    }
                }
            });
        }

        n.num_children = n.children.len() as u64;
        n.num_descendants = counts.descendants;
        n.num_descendants_archived = counts.descendants_archived;
        n.num_leaves = counts.leaves;
        n.num_leaves_archived = counts.leaves_archived;
        n.sort_children();
    });
}

/// Summary statistics projected from an aggregated root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total proper descendants of the root.
    pub total_nodes: u64,
    /// Descendants carrying an archived signal.
    pub archived_nodes: u64,
    /// Total leaves.
    pub total_leaves: u64,
    /// Leaves carrying an archived signal.
    pub archived_leaves: u64,
    /// Longest root-to-leaf path.
    pub max_depth: u32,
}

impl TreeStats {
    /// Project stats from an aggregated tree.
    pub fn from_root(root: &Node) -> Self {
        Self {
            total_nodes: root.num_descendants,
            archived_nodes: root.num_descendants_archived,
            total_leaves: root.num_leaves,
            archived_leaves: root.num_leaves_archived,
            max_depth: root.depth(),
        }
    }

    /// Fraction of descendants archived, 0.0 for an empty tree.
    pub fn coverage_ratio(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            self.archived_nodes as f64 / self.total_nodes as f64
        }
    }

    /// Fraction of leaves archived, 0.0 for an empty tree.
    pub fn leaf_coverage_ratio(&self) -> f64 {
        if self.total_leaves == 0 {
            0.0
        } else {
            self.archived_leaves as f64 / self.total_leaves as f64
        }
    }
}
