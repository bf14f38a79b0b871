//! # kioku-vfs
//!
//! Path-based virtual filesystem over the kioku store.
//!
//! - [`VfsOps`] - core trait for filesystem operations
//! - [`MemoryFs`] - the in-memory implementation, one lock around one store
//! - [`FsConfig`] - permissions and resource limits, loadable from TOML
//!
//! ## Design Decisions
//!
//! - **Path-based, no handles**: operations take paths; callers that need a
//!   cursor keep it themselves and drive [`MemoryFs::node`] directly.
//! - **Explicit offset/size**: reads and writes are positional.
//! - **Sorted listings**: the store's child index is unordered, so
//!   [`VfsOps::readdir`] sorts by name.

mod config;
mod error;
mod memory;
mod ops;
mod types;

pub use config::{DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, FsConfig};
pub use error::{VfsError, VfsResult};
pub use memory::MemoryFs;
pub use ops::VfsOps;
pub use types::{DirEntry, FileAttr, StatFs};

pub use kioku_store::{FileType, Mode, NodeRef, OpenFlags, StoreError};
