//! Core VFS types.

use kioku_store::{FileType, Mode, Node, OpenFlags};

/// File attributes (metadata).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttr {
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Unix permissions (e.g., 0o644).
    pub perm: u32,
    /// Full mode, type bit included.
    pub mode: Mode,
    /// Flags the node was created with.
    pub flags: OpenFlags,
}

impl FileAttr {
    /// Snapshot the attributes of a node.
    pub fn from_node(node: &Node) -> Self {
        Self {
            size: node.size() as u64,
            kind: node.kind(),
            perm: node.mode().perm(),
            mode: node.mode(),
            flags: node.flags(),
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: FileType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FileType::File)
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, FileType::Directory)
    }
}

/// Filesystem usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatFs {
    /// Regular files.
    pub files: usize,
    /// Directories, root included.
    pub directories: usize,
    /// Sum of all file sizes.
    pub bytes: u64,
    /// Configured node cap.
    pub max_nodes: Option<usize>,
    /// Configured per-file size cap.
    pub max_file_size: Option<u64>,
}

impl StatFs {
    /// Total nodes.
    pub fn nodes(&self) -> usize {
        self.files + self.directories
    }
}
