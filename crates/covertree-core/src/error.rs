//! Error types for tree building and cache operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the cache artifact.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Permission denied for the cache path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact exists but does not decode to a tree.
    #[error("Malformed cache at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The tree could not be encoded.
    #[error("Failed to encode tree: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors a repository may report from URL insertion.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store could not be queried.
    #[error("Repository {id} unavailable: {message}")]
    Unavailable { id: String, message: String },

    /// Reading repository data failed.
    #[error("Repository {id} I/O error at {path}: {source}")]
    Io {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Repository data could not be decoded.
    #[error("Repository {id} returned malformed data from {path}: {source}")]
    Malformed {
        id: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A URL supplied by the repository could not be placed in the tree.
    #[error("Repository {id}: {source}")]
    Tree {
        id: String,
        #[source]
        source: CoverageError,
    },

    /// A source filter pattern is invalid.
    #[error("Invalid source pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RepositoryError {
    /// Create an unavailable error.
    pub fn unavailable(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Errors from tree construction and orchestration.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// URL could not be split into tree segments.
    #[error("Invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Cache load or save failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A repository failed while inserting URLs.
    #[error(transparent)]
    Repository(#[from] Box<RepositoryError>),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<RepositoryError> for CoverageError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(Box::new(err))
    }
}
