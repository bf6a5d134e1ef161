//! Coverage repositories for covertree.
//!
//! A repository is a pluggable data source that knows which URLs exist
//! for one external system and which of them are archived. This crate
//! provides:
//!
//! - **[`CoverageRepository`]** - the insertion/coverage contract
//! - **[`Source`]** - URL pattern filters passed to every insertion
//! - **[`RepositoryRegistry`]** - ordered, id-keyed selection
//! - **[`StaticRepository`]** and **[`ManifestRepository`]** - built-in
//!   repositories backed by memory and by a JSON manifest file
//!
//! # Example
//!
//! ```rust
//! use covertree_repo::{CoverageRepository, Node, StaticRepository};
//!
//! let repo = StaticRepository::new("eot").with_url("https://www.epa.gov/climate", true);
//! let mut tree = Node::root();
//! repo.add_urls(&mut tree, &[]).unwrap();
//! repo.add_coverage(&mut tree);
//!
//! assert!(tree.find("www.epa.gov/climate").unwrap().archived);
//! ```

mod manifest;
mod registry;
mod repository;
mod source;
mod static_repo;

pub use manifest::{Manifest, ManifestRepository};
pub use registry::{RepositoryRef, RepositoryRegistry};
pub use repository::{CoverageRepository, RepositoryInfo, UrlEntry};
pub use source::{Source, matches_any};
pub use static_repo::StaticRepository;

// Re-export core types for convenience
pub use covertree_core::{CoverageRecord, Node, RepositoryError};
