//! VFS operations trait.
//!
//! Path-based, with explicit offsets and sizes. Implementations hold no
//! per-caller cursor state; handle layers keep their own positions.

use async_trait::async_trait;
use std::path::Path;

use crate::config::DEFAULT_FILE_PERM;
use crate::types::{DirEntry, FileAttr, StatFs};
use crate::VfsResult;
use kioku_store::OpenFlags;

/// Core VFS operations trait.
#[async_trait]
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get file attributes.
    async fn getattr(&self, path: &Path) -> VfsResult<FileAttr>;

    /// Read directory entries, sorted by name.
    async fn readdir(&self, path: &Path) -> VfsResult<Vec<DirEntry>>;

    /// Read file contents.
    ///
    /// Reads up to `size` bytes starting at `offset`.
    /// Returns fewer bytes near the end, and none at or past it.
    async fn read(&self, path: &Path, offset: u64, size: u32) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write data to a file.
    ///
    /// Writes `data` at the specified `offset`, zero-filling any gap.
    /// Returns the number of bytes written.
    async fn write(&self, path: &Path, offset: u64, data: &[u8]) -> VfsResult<u32>;

    /// Create a new, empty file. Missing parent directories are created.
    async fn create(&self, path: &Path, perm: u32) -> VfsResult<FileAttr>;

    /// Create a directory and any missing parents.
    ///
    /// Succeeds without change if the directory already exists.
    async fn mkdir(&self, path: &Path, perm: u32) -> VfsResult<FileAttr>;

    /// Open a path according to `flags`, creating it if asked to.
    async fn open(&self, path: &Path, flags: OpenFlags, perm: u32) -> VfsResult<FileAttr>;

    /// Remove a file.
    async fn unlink(&self, path: &Path) -> VfsResult<()>;

    /// Remove an empty directory.
    async fn rmdir(&self, path: &Path) -> VfsResult<()>;

    /// Rename a file or directory, carrying its whole subtree.
    async fn rename(&self, from: &Path, to: &Path) -> VfsResult<()>;

    /// Truncate or extend a file to the specified size.
    async fn truncate(&self, path: &Path, size: u64) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get filesystem statistics.
    async fn statfs(&self) -> VfsResult<StatFs>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> bool {
        self.getattr(path).await.is_ok()
    }

    /// Read entire file contents.
    async fn read_all(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let attr = self.getattr(path).await?;
        let size = u32::try_from(attr.size).unwrap_or(u32::MAX);
        self.read(path, 0, size).await
    }

    /// Write entire file contents.
    ///
    /// Truncates an existing file, or creates a new one.
    async fn write_all(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        if self.exists(path).await {
            self.truncate(path, 0).await?;
        } else {
            self.create(path, DEFAULT_FILE_PERM).await?;
        }
        self.write(path, 0, data).await?;
        Ok(())
    }
}
