//! # kioku-store
//!
//! Path-indexed storage engine for the kioku in-memory filesystem.
//!
//! - [`PathStore`] - the namespace: existence, lookup, listing, rename, remove
//! - [`ContentBuffer`] - one file's bytes, with positional reads and writes
//! - [`Node`] - a file or directory, shared via [`NodeRef`]
//!
//! The store is synchronous and unsynchronized. It holds no cursors, enforces
//! no permissions beyond directory-vs-file, and never touches a disk.
//!
//! ```
//! use kioku_store::{Mode, OpenFlags, PathStore};
//!
//! let mut store = PathStore::new();
//! let node = store
//!     .create("/a/b/c.txt", Mode::file(0o644), OpenFlags::create())
//!     .unwrap()
//!     .unwrap();
//! node.write().content_mut().write_at(b"hello", 0);
//!
//! assert!(store.has("/a/b"));
//! assert_eq!(store.children("/a/b").len(), 1);
//! ```

mod content;
mod error;
mod mode;
mod node;
pub mod path;
mod store;

pub use content::ContentBuffer;
pub use error::{StoreError, StoreResult};
pub use mode::{FileType, Mode, OpenFlags};
pub use node::{Node, NodeRef};
pub use store::{PathStore, RENAME_PARENT_PERM};
