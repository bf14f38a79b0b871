//! Lexical path canonicalization.
//!
//! The store keys everything by canonical path, so every public entry point
//! runs its input through [`canonicalize`] first. Nothing here touches a real
//! filesystem.

use std::path::{Component, Path, PathBuf};

/// The namespace root.
pub const ROOT: &str = "/";

/// Clean a path into its canonical absolute form.
///
/// - repeated separators collapse to one
/// - `.` segments are dropped
/// - `..` removes the preceding segment, and is a no-op at the root
/// - trailing separators are stripped
/// - relative input is rooted at `/`
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
    let mut result = PathBuf::from(ROOT);
    for component in path.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(s) => result.push(s),
        }
    }
    result
}

/// Returns true if `path` is the canonical root.
pub fn is_root(path: &Path) -> bool {
    path.as_os_str() == ROOT
}

/// Final segment of a canonical path, `/` for the root.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROOT.to_string())
}

/// Canonical parent of a canonical path, `None` for the root.
pub fn parent(path: &Path) -> Option<PathBuf> {
    path.parent().map(Path::to_path_buf)
}

/// Returns true if `path` lies strictly beneath `ancestor`.
///
/// Comparison is per component, so `/ab` is not beneath `/a`.
pub fn is_descendant(path: &Path, ancestor: &Path) -> bool {
    path != ancestor && path.starts_with(ancestor)
}

/// Number of normal segments in a canonical path; the root has depth zero.
pub fn depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

/// Display form used in error messages.
pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
