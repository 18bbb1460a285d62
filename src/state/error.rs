use std::path::PathBuf;

use thiserror::Error;

/// User input that was rejected before touching storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a tab name.")]
    EmptyName,

    #[error("Tab name '{0}' cannot contain path separators.")]
    InvalidName(String),

    #[error("A catalog named '{0}' is already open.")]
    DuplicateName(String),
}

/// Errors raised by the catalog store and controller
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot open catalog at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("catalog query failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog at {} is closed", .0.display())]
    Closed(PathBuf),

    #[error("no catalog bound to tab {index}")]
    NotFound { index: usize },
}

/// Why a single selected path was not recorded
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("empty path")]
    EmptyPath,

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to insert {}: {source}", .path.display())]
    Insert {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}
