//! Coverage tree generation for covertree.
//!
//! Two entry points build a tree from repositories:
//!
//! - **[`CoverageGenerator::tree`]** - fresh tree from the selected
//!   repositories, fail-fast on the first repository error, archived
//!   signal taken from coverage records
//! - **[`init_tree`]** - full rebuild on top of the cached tree,
//!   best-effort across repositories, archived signal taken from the node
//!   flag, cache written back
//!
//! ```rust
//! use covertree_gen::CoverageGenerator;
//! use covertree_repo::{RepositoryRegistry, StaticRepository};
//!
//! let mut registry = RepositoryRegistry::new();
//! registry.register(StaticRepository::new("eot").with_url("https://www.epa.gov/climate", true));
//!
//! let generator = CoverageGenerator::new::<&str, &str>(&registry, &[], &[]).unwrap();
//! let summary = generator.summary().unwrap();
//! assert_eq!(summary.descendants, 2);
//! assert_eq!(summary.archived, 1);
//! ```

mod generator;
mod rebuild;

pub use generator::{CoverageGenerator, Summary};
pub use rebuild::{InitOutcome, RepositoryFailure, init_tree};

// Re-export core types
pub use covertree_core::{AggregationMode, CacheStore, CoverageConfig, CoverageError, Node};
