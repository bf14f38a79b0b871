//! Store error types.

use std::io;
use thiserror::Error;

/// Errors surfaced by [`PathStore`](crate::PathStore) and
/// [`ContentBuffer`](crate::ContentBuffer).
///
/// None of these are transient. They follow deterministically from the
/// namespace state, so retrying with the same arguments gives the same result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No node exists at the path.
    #[error("not found: {0}")]
    NotFound(String),

    /// A non-directory node already occupies the path.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Directory still has children.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Read offset at or past the end of the buffer.
    #[error("end of data")]
    EndOfData,

    /// Structurally impossible request (e.g. moving a directory into itself).
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl StoreError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Returns true for the end-of-stream marker rather than a real failure.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData)
    }
}

impl From<StoreError> for io::Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            StoreError::AlreadyExists(msg) => io::Error::new(io::ErrorKind::AlreadyExists, msg),
            StoreError::DirectoryNotEmpty(msg) => {
                io::Error::new(io::ErrorKind::DirectoryNotEmpty, msg)
            }
            StoreError::EndOfData => io::Error::new(io::ErrorKind::UnexpectedEof, "end of data"),
            StoreError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
        }
    }
}

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds() {
        let e: io::Error = StoreError::not_found("/a").into();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);

        let e: io::Error = StoreError::directory_not_empty("/a").into();
        assert_eq!(e.kind(), io::ErrorKind::DirectoryNotEmpty);

        let e: io::Error = StoreError::EndOfData.into();
        assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::already_exists("/a.txt").to_string(),
            "already exists: /a.txt"
        );
        assert!(StoreError::EndOfData.is_end_of_data());
        assert!(!StoreError::not_found("/x").is_end_of_data());
    }
}
