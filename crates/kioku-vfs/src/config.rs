//! Filesystem configuration.
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! file_perm = 0o644
//! dir_perm = 0o755
//! max_file_size = 1048576   # bytes; omit for unbounded
//! max_nodes = 10000         # files + directories; omit for unbounded
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::VfsResult;

/// Default permissions for files created without an explicit mode.
pub const DEFAULT_FILE_PERM: u32 = 0o644;

/// Default permissions for the root and explicitly created directories.
pub const DEFAULT_DIR_PERM: u32 = 0o755;

/// Limits and defaults for a [`MemoryFs`](crate::MemoryFs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsConfig {
    /// Permissions `MemoryFs::write_all` and the CLI give new files.
    pub file_perm: u32,
    /// Permissions for the root and CLI-created directories.
    pub dir_perm: u32,
    /// Largest size any single file may reach.
    pub max_file_size: Option<u64>,
    /// Largest number of nodes the namespace may hold.
    pub max_nodes: Option<usize>,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            file_perm: DEFAULT_FILE_PERM,
            dir_perm: DEFAULT_DIR_PERM,
            max_file_size: None,
            max_nodes: None,
        }
    }
}

impl FsConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> VfsResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> VfsResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Set the per-file size cap.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Set the node count cap.
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VfsError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FsConfig::default();
        assert_eq!(config.file_perm, 0o644);
        assert_eq!(config.dir_perm, 0o755);
        assert!(config.max_file_size.is_none());
        assert!(config.max_nodes.is_none());

        assert_eq!(FsConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_partial() {
        let config = FsConfig::from_toml_str("file_perm = 0o600\nmax_file_size = 4096\n").unwrap();
        assert_eq!(config.file_perm, 0o600);
        assert_eq!(config.dir_perm, DEFAULT_DIR_PERM);
        assert_eq!(config.max_file_size, Some(4096));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FsConfig::from_toml_str("max_files = 3\n").unwrap_err();
        assert!(matches!(err, VfsError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_nodes = 12").unwrap();
        writeln!(file, "dir_perm = 0o700").unwrap();

        let config = FsConfig::load(file.path()).unwrap();
        assert_eq!(config.max_nodes, Some(12));
        assert_eq!(config.dir_perm, 0o700);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VfsError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let config = FsConfig::default().with_max_file_size(10).with_max_nodes(5);
        assert_eq!(config.max_file_size, Some(10));
        assert_eq!(config.max_nodes, Some(5));
    }
}
