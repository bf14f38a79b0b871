//! Filesystem nodes.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::content::ContentBuffer;
use crate::mode::{FileType, Mode, OpenFlags};
use crate::path;

/// Shared handle to a node.
///
/// There is exactly one `Node` per path; every lookup hands out a clone of
/// the same `Arc`, so content written through one handle is visible through
/// all of them.
pub type NodeRef = Arc<RwLock<Node>>;

/// One file or directory.
///
/// Directories carry an (unused) content buffer too.
#[derive(Debug)]
pub struct Node {
    path: PathBuf,
    name: String,
    mode: Mode,
    flags: OpenFlags,
    content: ContentBuffer,
}

impl Node {
    /// Create a node at an already-canonical path.
    pub fn new(path: PathBuf, mode: Mode, flags: OpenFlags) -> Self {
        let name = path::base_name(&path);
        Self {
            path,
            name,
            mode,
            flags,
            content: ContentBuffer::new(),
        }
    }

    pub(crate) fn into_ref(self) -> NodeRef {
        Arc::new(RwLock::new(self))
    }

    /// Canonical path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name; `/` for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Creation-time open flags.
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    pub fn kind(&self) -> FileType {
        self.mode.kind()
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Content length in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn content(&self) -> &ContentBuffer {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentBuffer {
        &mut self.content
    }

    /// Point the node at a new canonical path, keeping the name in sync.
    pub(crate) fn relocate(&mut self, to: PathBuf) {
        self.name = path::base_name(&to);
        self.path = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node = Node::new(PathBuf::from("/a/b.txt"), Mode::file(0o600), OpenFlags::create());
        assert_eq!(node.name(), "b.txt");
        assert_eq!(node.path(), Path::new("/a/b.txt"));
        assert_eq!(node.size(), 0);
        assert!(!node.is_dir());
        assert!(node.flags().create);
    }

    #[test]
    fn test_relocate_updates_name() {
        let mut node = Node::new(PathBuf::from("/a/b.txt"), Mode::file(0o644), OpenFlags::none());
        node.relocate(PathBuf::from("/x/y.txt"));
        assert_eq!(node.name(), "y.txt");
        assert_eq!(node.path(), Path::new("/x/y.txt"));
    }

    #[test]
    fn test_shared_ref_sees_writes() {
        let a = Node::new(PathBuf::from("/f"), Mode::file(0o644), OpenFlags::none()).into_ref();
        let b = Arc::clone(&a);
        a.write().content_mut().write_at(b"shared", 0);
        assert_eq!(b.read().content().as_slice(), b"shared");
    }
}
