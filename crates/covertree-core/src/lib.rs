//! Core types for covertree.
//!
//! This crate provides the coverage tree data model, the depth-first
//! walker, the statistics aggregator and the JSON cache store shared by
//! the repository and generator crates.

mod cache;
mod config;
mod error;
mod node;
mod tree;

pub use cache::{CacheStore, DEFAULT_CACHE_FILE};
pub use config::{CoverageConfig, CoverageConfigBuilder};
pub use error::{CacheError, CoverageError, RepositoryError};
pub use node::{CoverageRecord, Node, ROOT_ID, ROOT_NAME, url_segments};
pub use tree::{AggregationMode, TreeStats, aggregate};
