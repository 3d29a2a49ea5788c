//! Error types for dotgit.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for dotgit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The specified path is not a valid Git repository.
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// The specified path was not found.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The provided string is not a valid object ID.
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    /// The requested object was not found, loose or packed.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Object content does not follow the expected grammar.
    #[error("parse error: {0}")]
    Parse(String),

    /// Zlib decompression failed.
    #[error("zlib decompression failed")]
    DecompressionFailed,

    /// The operation exists in the API but has no implementation yet.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Type mismatch when expecting a specific object type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: &'static str,
        /// The actual type.
        actual: &'static str,
    },

    /// Invalid UTF-8 sequence encountered.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,

    /// A configuration file or value is malformed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The repository uses a format this crate cannot read.
    #[error("unsupported repository format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Shorthand for building an [`Error::Parse`].
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse(reason.into())
    }
}

/// Result type alias for dotgit operations.
pub type Result<T> = std::result::Result<T, Error>;
