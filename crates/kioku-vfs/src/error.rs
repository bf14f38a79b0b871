//! VFS error types.

use std::io;
use thiserror::Error;

use kioku_store::StoreError;

/// VFS error type.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Namespace or content error from the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A configured limit would be exceeded.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Argument out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::Store(StoreError::not_found(path))
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::Store(StoreError::already_exists(path))
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create a PermissionDenied error.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a ResourceExhausted error.
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Store(StoreError::AlreadyExists(_)))
    }

    pub fn is_not_empty(&self) -> bool {
        matches!(self, Self::Store(StoreError::DirectoryNotEmpty(_)))
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::Store(e) => e.into(),
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::PermissionDenied(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            VfsError::ResourceExhausted(msg) => io::Error::new(io::ErrorKind::StorageFull, msg),
            VfsError::InvalidInput(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            VfsError::Config(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            VfsError::Io(e) => e,
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;
