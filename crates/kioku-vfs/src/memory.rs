//! In-memory filesystem.
//!
//! [`MemoryFs`] puts one [`PathStore`] behind a single mutex and layers the
//! file-vs-directory checks, open-flag handling and size limits on top. All
//! data is lost when it is dropped.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use kioku_store::path::{self, canonicalize};
use kioku_store::{Mode, NodeRef, OpenFlags, PathStore, StoreError};

use crate::config::FsConfig;
use crate::error::{VfsError, VfsResult};
use crate::ops::VfsOps;
use crate::types::{DirEntry, FileAttr, StatFs};

/// In-memory filesystem.
///
/// Namespace changes are serialized by one mutex around the store. Content
/// reads and writes only take the per-node lock.
#[derive(Debug)]
pub struct MemoryFs {
    store: Mutex<PathStore>,
    config: FsConfig,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty filesystem with default configuration.
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    /// Create an empty filesystem. The root directory always exists.
    pub fn with_config(config: FsConfig) -> Self {
        let mut store = PathStore::new();
        // An empty store has nothing to collide with.
        let _ = store.create(path::ROOT, Mode::dir(config.dir_perm), OpenFlags::none());
        Self {
            store: Mutex::new(store),
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// The shared node at `path`, for callers that keep their own cursor.
    pub fn node(&self, path: impl AsRef<Path>) -> Option<NodeRef> {
        self.store.lock().get(path)
    }

    /// Every path in the namespace, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.store.lock().paths()
    }

    /// Look up a node that must be a regular file.
    fn file_node(&self, path: &Path) -> VfsResult<NodeRef> {
        let node = self
            .store
            .lock()
            .get(path)
            .ok_or_else(|| VfsError::not_found(path_str(path)))?;
        if node.read().is_dir() {
            return Err(VfsError::is_a_directory(path_str(path)));
        }
        Ok(node)
    }

    /// Fail if creating `path` (and its missing ancestors) would exceed the node cap.
    fn reserve_nodes(&self, store: &PathStore, path: &Path) -> VfsResult<()> {
        let Some(max) = self.config.max_nodes else {
            return Ok(());
        };
        let missing = path.ancestors().take_while(|p| !store.has(p)).count();
        if store.len() + missing > max {
            return Err(VfsError::resource_exhausted(format!(
                "node limit {max} reached creating {}",
                path.display()
            )));
        }
        Ok(())
    }

    /// Fail if a file would grow past the size cap.
    fn check_file_size(&self, path: &Path, size: u64) -> VfsResult<()> {
        match self.config.max_file_size {
            Some(max) if size > max => Err(VfsError::resource_exhausted(format!(
                "{} would grow to {size} bytes, limit is {max}",
                path.display()
            ))),
            _ => Ok(()),
        }
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

fn to_usize(value: u64, what: &str) -> VfsResult<usize> {
    usize::try_from(value).map_err(|_| VfsError::invalid_input(format!("{what} {value} out of range")))
}

#[async_trait]
impl VfsOps for MemoryFs {
    async fn getattr(&self, path: &Path) -> VfsResult<FileAttr> {
        let node = self
            .store
            .lock()
            .get(path)
            .ok_or_else(|| VfsError::not_found(path_str(&canonicalize(path))))?;
        let attr = FileAttr::from_node(&node.read());
        Ok(attr)
    }

    async fn readdir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let path = canonicalize(path);
        let store = self.store.lock();

        let node = store
            .get(&path)
            .ok_or_else(|| VfsError::not_found(path_str(&path)))?;
        if !node.read().is_dir() {
            return Err(VfsError::not_a_directory(path_str(&path)));
        }

        let mut entries: Vec<DirEntry> = store
            .children(&path)
            .iter()
            .map(|child| {
                let child = child.read();
                DirEntry::new(child.name(), child.kind())
            })
            .collect();

        // The child index is unordered.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read(&self, path: &Path, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
        let path = canonicalize(path);
        let node = self.file_node(&path)?;

        let Ok(offset) = usize::try_from(offset) else {
            return Ok(Vec::new());
        };
        let mut buf = vec![0u8; size as usize];
        match node.read().content().read_at(&mut buf, offset) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(StoreError::EndOfData) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, path: &Path, offset: u64, data: &[u8]) -> VfsResult<u32> {
        let path = canonicalize(path);
        let node = self.file_node(&path)?;
        let written = u32::try_from(data.len())
            .map_err(|_| VfsError::invalid_input("write larger than 4 GiB"))?;

        let mut node = node.write();
        let offset = if node.flags().append {
            node.size()
        } else {
            to_usize(offset, "offset")?
        };
        let end = offset
            .checked_add(data.len())
            .ok_or_else(|| VfsError::invalid_input("write end overflows"))?;
        self.check_file_size(&path, end as u64)?;

        node.content_mut().write_at(data, offset);
        trace!(path = %path.display(), offset, len = data.len(), "wrote");
        Ok(written)
    }

    #[tracing::instrument(skip(self), name = "memfs.create")]
    async fn create(&self, path: &Path, perm: u32) -> VfsResult<FileAttr> {
        let path = canonicalize(path);
        let mut store = self.store.lock();

        if store.has(&path) {
            return Err(VfsError::already_exists(path_str(&path)));
        }
        self.reserve_nodes(&store, &path)?;

        let node = store
            .create(&path, Mode::file(perm), OpenFlags::create())?
            .ok_or_else(|| VfsError::already_exists(path_str(&path)))?;
        let attr = FileAttr::from_node(&node.read());
        Ok(attr)
    }

    #[tracing::instrument(skip(self), name = "memfs.mkdir")]
    async fn mkdir(&self, path: &Path, perm: u32) -> VfsResult<FileAttr> {
        let path = canonicalize(path);
        let mut store = self.store.lock();

        self.reserve_nodes(&store, &path)?;
        let node = match store.create(&path, Mode::dir(perm), OpenFlags::none())? {
            Some(node) => node,
            None => store.must_get(&path),
        };
        let attr = FileAttr::from_node(&node.read());
        Ok(attr)
    }

    #[tracing::instrument(skip(self), name = "memfs.open")]
    async fn open(&self, path: &Path, flags: OpenFlags, perm: u32) -> VfsResult<FileAttr> {
        let path = canonicalize(path);
        let node = {
            let mut store = self.store.lock();
            match store.get(&path) {
                Some(_) if flags.create && flags.exclusive => {
                    return Err(VfsError::already_exists(path_str(&path)));
                }
                Some(node) => node,
                None if flags.create => {
                    self.reserve_nodes(&store, &path)?;
                    store
                        .create(&path, Mode::file(perm), flags)?
                        .ok_or_else(|| VfsError::already_exists(path_str(&path)))?
                }
                None => return Err(VfsError::not_found(path_str(&path))),
            }
        };

        let mut node = node.write();
        if node.is_dir() && (flags.write || flags.truncate) {
            return Err(VfsError::is_a_directory(path_str(&path)));
        }
        if flags.truncate && flags.write {
            node.content_mut().truncate(0);
        }
        Ok(FileAttr::from_node(&node))
    }

    #[tracing::instrument(skip(self), name = "memfs.unlink")]
    async fn unlink(&self, path: &Path) -> VfsResult<()> {
        let path = canonicalize(path);
        if path::is_root(&path) {
            return Err(VfsError::permission_denied("cannot remove root"));
        }

        let mut store = self.store.lock();
        let node = store
            .get(&path)
            .ok_or_else(|| VfsError::not_found(path_str(&path)))?;
        if node.read().is_dir() {
            return Err(VfsError::is_a_directory(path_str(&path)));
        }
        store.remove(&path)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "memfs.rmdir")]
    async fn rmdir(&self, path: &Path) -> VfsResult<()> {
        let path = canonicalize(path);
        if path::is_root(&path) {
            return Err(VfsError::permission_denied("cannot remove root"));
        }

        let mut store = self.store.lock();
        let node = store
            .get(&path)
            .ok_or_else(|| VfsError::not_found(path_str(&path)))?;
        if !node.read().is_dir() {
            return Err(VfsError::not_a_directory(path_str(&path)));
        }
        store.remove(&path)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "memfs.rename")]
    async fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        let to = canonicalize(to);
        let mut store = self.store.lock();

        if let Some(parent) = path::parent(&to) {
            self.reserve_nodes(&store, &parent)?;
        }
        store.rename(from, &to)?;
        Ok(())
    }

    async fn truncate(&self, path: &Path, size: u64) -> VfsResult<()> {
        let path = canonicalize(path);
        let node = self.file_node(&path)?;
        self.check_file_size(&path, size)?;
        let size = to_usize(size, "size")?;

        node.write().content_mut().truncate(size);
        debug!(path = %path.display(), size, "truncated");
        Ok(())
    }

    async fn statfs(&self) -> VfsResult<StatFs> {
        let store = self.store.lock();
        let mut stats = StatFs {
            max_nodes: self.config.max_nodes,
            max_file_size: self.config.max_file_size,
            ..Default::default()
        };
        for path in store.paths() {
            let node = store.must_get(&path);
            let node = node.read();
            if node.is_dir() {
                stats.directories += 1;
            } else {
                stats.files += 1;
                stats.bytes += node.size() as u64;
            }
        }
        Ok(stats)
    }

    async fn write_all(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        if self.exists(path).await {
            self.truncate(path, 0).await?;
        } else {
            self.create(path, self.config.file_perm).await?;
        }
        self.write(path, 0, data).await?;
        Ok(())
    }
}
