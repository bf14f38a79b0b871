//! Mode bits and open flags.

use std::fmt;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Permission bits plus a directory type bit.
///
/// Permissions are stored, never enforced. Whether a node is a directory is
/// decided by [`Mode::DIR`] alone.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode(u32);

impl Mode {
    /// Directory type bit (`S_IFDIR`).
    pub const DIR: u32 = 0o040000;

    /// Permission mask, including setuid/setgid/sticky.
    pub const PERM_MASK: u32 = 0o7777;

    /// Wrap raw mode bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// A regular file mode with the given permissions.
    pub const fn file(perm: u32) -> Self {
        Self(perm & Self::PERM_MASK)
    }

    /// A directory mode with the given permissions.
    pub const fn dir(perm: u32) -> Self {
        Self((perm & Self::PERM_MASK) | Self::DIR)
    }

    /// Raw mode bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Permission bits only.
    pub const fn perm(self) -> u32 {
        self.0 & Self::PERM_MASK
    }

    pub const fn is_dir(self) -> bool {
        self.0 & Self::DIR != 0
    }

    /// Same permissions with the directory bit forced on.
    pub const fn as_dir(self) -> Self {
        Self::dir(self.perm())
    }

    pub fn kind(self) -> FileType {
        if self.is_dir() {
            FileType::Directory
        } else {
            FileType::File
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode({:#o})", self.0)
    }
}

impl fmt::Display for Mode {
    /// `ls -l` style: `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let perm = self.perm();
        let kind = if self.is_dir() { 'd' } else { '-' };
        let mut out = String::with_capacity(10);
        out.push(kind);
        for shift in [6u32, 3, 0] {
            let bits = (perm >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&out)
    }
}

/// Open file flags.
///
/// Recorded on a node at creation time. The store never interprets them;
/// the handle layer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
    /// Read access requested.
    pub read: bool,
    /// Write access requested.
    pub write: bool,
    /// Append mode.
    pub append: bool,
    /// Create if not exists.
    pub create: bool,
    /// Truncate on open.
    pub truncate: bool,
    /// Exclusive create (fail if exists).
    pub exclusive: bool,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
            exclusive: false,
        }
    }
}

impl OpenFlags {
    /// No flags at all; what synthesized ancestor directories carry.
    pub fn none() -> Self {
        Self {
            read: false,
            ..Default::default()
        }
    }

    /// Read-only access.
    pub fn read() -> Self {
        Self::default()
    }

    /// Write access (also enables read).
    pub fn write() -> Self {
        Self {
            read: true,
            write: true,
            ..Default::default()
        }
    }

    /// Create with write access.
    pub fn create() -> Self {
        Self {
            read: true,
            write: true,
            create: true,
            ..Default::default()
        }
    }

    /// Create exclusively (fail if exists).
    pub fn create_exclusive() -> Self {
        Self {
            exclusive: true,
            ..Self::create()
        }
    }

    /// Create and truncate.
    pub fn create_truncate() -> Self {
        Self {
            truncate: true,
            ..Self::create()
        }
    }

    /// Create and append.
    pub fn append() -> Self {
        Self {
            append: true,
            ..Self::create()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits() {
        let file = Mode::file(0o644);
        assert!(!file.is_dir());
        assert_eq!(file.perm(), 0o644);
        assert_eq!(file.kind(), FileType::File);

        let dir = file.as_dir();
        assert!(dir.is_dir());
        assert_eq!(dir.perm(), 0o644);
        assert_eq!(dir.bits(), 0o040644);
        assert_eq!(dir.kind(), FileType::Directory);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::dir(0o755).to_string(), "drwxr-xr-x");
        assert_eq!(Mode::file(0o640).to_string(), "-rw-r-----");
    }

    #[test]
    fn test_open_flags() {
        let read = OpenFlags::read();
        assert!(read.read);
        assert!(!read.write);

        let create = OpenFlags::create_exclusive();
        assert!(create.create);
        assert!(create.exclusive);
        assert!(create.write);

        let append = OpenFlags::append();
        assert!(append.append);
        assert!(!append.truncate);

        assert!(!OpenFlags::none().read);
    }
}
