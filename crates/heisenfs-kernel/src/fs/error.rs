//! Filesystem error types.

use std::io;
use thiserror::Error;

/// Filesystem error type.
///
/// Every error is returned synchronously; nothing is retried internally.
/// Anomalous observation transitions are not errors and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// The path names no file in the table.
    #[error("not found: {0}")]
    NotFound(String),

    /// A file with this name already exists.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// The table already holds its maximum number of files.
    #[error("file table full ({capacity} files)")]
    CapacityExceeded { capacity: usize },

    /// A write or truncate would pass the fixed buffer capacity.
    #[error("range {offset}+{len} exceeds file capacity of {capacity} bytes")]
    OutOfRange {
        offset: u64,
        len: u64,
        capacity: usize,
    },

    /// The name is empty, nested, or too long.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The operation is not supported by this filesystem.
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),
}

impl FsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a DuplicateName error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create an InvalidName error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}

/// Convert FsError to std::io::Error so a bridge can derive an errno.
impl From<FsError> for io::Error {
    fn from(e: FsError) -> Self {
        let kind = match &e {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::DuplicateName(_) => io::ErrorKind::AlreadyExists,
            FsError::CapacityExceeded { .. } => io::ErrorKind::StorageFull,
            FsError::OutOfRange { .. } => io::ErrorKind::InvalidInput,
            FsError::InvalidName(_) => io::ErrorKind::InvalidInput,
            FsError::NotSupported(_) => io::ErrorKind::Unsupported,
        };
        io::Error::new(kind, e)
    }
}

/// Filesystem result type.
pub type FsResult<T> = Result<T, FsError>;
