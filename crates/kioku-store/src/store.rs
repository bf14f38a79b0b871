//! Path-indexed namespace.
//!
//! Two indices are kept in lockstep: `files` maps every canonical path to its
//! node, and `children` maps each directory path to its entries by base name.
//! All mutation goes through [`PathStore::create`], [`PathStore::rename`] and
//! [`PathStore::remove`], so the two cannot drift apart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::mode::{Mode, OpenFlags};
use crate::node::{Node, NodeRef};
use crate::path;

/// Permission bits for directories synthesized while relocating a subtree.
///
/// Creation derives ancestor permissions from the requested mode instead;
/// the two paths intentionally differ.
pub const RENAME_PARENT_PERM: u32 = 0o644;

/// In-memory namespace of files and directories.
///
/// Not internally synchronized. Callers sharing one store across threads
/// must serialize access themselves.
#[derive(Debug, Default)]
pub struct PathStore {
    files: HashMap<PathBuf, NodeRef>,
    children: HashMap<PathBuf, HashMap<String, NodeRef>>,
}

impl PathStore {
    /// Create an empty store. The root is synthesized on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a file or directory exists at `path`.
    pub fn has(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(&path::canonicalize(path))
    }

    /// Create a node, synthesizing any missing ancestor directories.
    ///
    /// Returns `Ok(None)` when a directory already exists at `path`, which
    /// makes repeated directory creation idempotent. Fails with
    /// [`StoreError::AlreadyExists`] when a regular file is already there, or
    /// when one of the ancestors is a regular file.
    ///
    /// Ancestors get `mode` with the directory bit forced on. The root is
    /// always a directory.
    pub fn create(
        &mut self,
        path: impl AsRef<Path>,
        mode: Mode,
        flags: OpenFlags,
    ) -> StoreResult<Option<NodeRef>> {
        self.create_canonical(path::canonicalize(path), mode, flags)
    }

    fn create_canonical(
        &mut self,
        path: PathBuf,
        mode: Mode,
        flags: OpenFlags,
    ) -> StoreResult<Option<NodeRef>> {
        if let Some(existing) = self.files.get(&path) {
            if existing.read().is_dir() {
                return Ok(None);
            }
            return Err(StoreError::already_exists(path::display(&path)));
        }

        self.ensure_parent(&path, mode.as_dir())?;

        let mode = if path::is_root(&path) { mode.as_dir() } else { mode };
        let node = Node::new(path.clone(), mode, flags).into_ref();
        self.files.insert(path.clone(), Arc::clone(&node));
        self.attach(&path, &node);

        trace!(path = %path.display(), ?mode, "created node");
        Ok(Some(node))
    }

    /// Make sure the parent of `path` exists as a directory.
    fn ensure_parent(&mut self, path: &Path, dir_mode: Mode) -> StoreResult<()> {
        let Some(parent) = path::parent(path) else {
            return Ok(());
        };
        self.create_canonical(parent, dir_mode, OpenFlags::none())?;
        Ok(())
    }

    /// Register `node` in its parent's child index.
    fn attach(&mut self, path: &Path, node: &NodeRef) {
        let Some(parent) = path::parent(path) else {
            return;
        };
        self.children
            .entry(parent)
            .or_default()
            .insert(path::base_name(path), Arc::clone(node));
    }

    /// Drop `path` from its parent's child index.
    fn detach(&mut self, path: &Path) {
        let Some(parent) = path::parent(path) else {
            return;
        };
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.remove(&path::base_name(path));
        }
    }

    /// Look up the node at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<NodeRef> {
        self.files.get(&path::canonicalize(path)).cloned()
    }

    /// Look up a node whose existence the caller has already established.
    ///
    /// # Panics
    ///
    /// Panics if nothing exists at `path`. Reaching that is a bug in the
    /// caller, not a recoverable condition.
    pub fn must_get(&self, path: impl AsRef<Path>) -> NodeRef {
        let path = path::canonicalize(path);
        match self.files.get(&path) {
            Some(node) => Arc::clone(node),
            None => panic!("path store has no node at {}", path.display()),
        }
    }

    /// Direct children of `path`, in no particular order.
    ///
    /// Empty for files, empty directories and missing paths alike.
    pub fn children(&self, path: impl AsRef<Path>) -> Vec<NodeRef> {
        self.children
            .get(&path::canonicalize(path))
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Move the subtree at `from` to `to`.
    ///
    /// Every descendant keeps its path relative to `from`. Missing ancestors
    /// of `to` are synthesized with [`RENAME_PARENT_PERM`]. An existing node
    /// at `to` is replaced unless it is a non-empty directory.
    pub fn rename(&mut self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> StoreResult<()> {
        let from = path::canonicalize(from);
        let to = path::canonicalize(to);

        if !self.files.contains_key(&from) {
            return Err(StoreError::not_found(path::display(&from)));
        }
        if from == to {
            return Ok(());
        }
        if path::is_root(&from) {
            return Err(StoreError::invalid_path("cannot rename the root"));
        }
        if path::is_descendant(&to, &from) {
            return Err(StoreError::invalid_path(format!(
                "cannot move {} beneath itself to {}",
                from.display(),
                to.display()
            )));
        }

        if let Some(existing) = self.files.get(&to) {
            let is_dir = existing.read().is_dir();
            if is_dir && self.has_children(&to) {
                return Err(StoreError::directory_not_empty(path::display(&to)));
            }
        }

        // Resolve the destination's ancestry up front so a failure leaves the
        // source subtree untouched.
        self.ensure_parent(&to, Mode::dir(RENAME_PARENT_PERM))?;
        if self.files.contains_key(&to) {
            self.discard(&to);
        }

        let mut descendants: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|candidate| path::is_descendant(candidate, &from))
            .cloned()
            .collect();
        descendants.sort_by_key(|p| path::depth(p));

        let mut moves = Vec::with_capacity(descendants.len() + 1);
        moves.push((from.clone(), to.clone()));
        for old in descendants {
            let relative = old
                .strip_prefix(&from)
                .map_err(|_| StoreError::invalid_path(path::display(&old)))?;
            let new = to.join(relative);
            moves.push((old, new));
        }

        for (old, new) in &moves {
            self.relocate(old, new)?;
        }

        debug!(
            from = %from.display(),
            to = %to.display(),
            moved = moves.len(),
            "renamed subtree"
        );
        Ok(())
    }

    /// Re-key a single node. Parents must be relocated before their children.
    fn relocate(&mut self, from: &Path, to: &Path) -> StoreResult<()> {
        let node = self
            .files
            .remove(from)
            .ok_or_else(|| StoreError::not_found(path::display(from)))?;
        self.detach(from);

        node.write().relocate(to.to_path_buf());
        if let Some(entries) = self.children.remove(from) {
            self.children.insert(to.to_path_buf(), entries);
        }
        self.files.insert(to.to_path_buf(), Arc::clone(&node));

        self.ensure_parent(to, Mode::dir(RENAME_PARENT_PERM))?;
        self.attach(to, &node);

        trace!(from = %from.display(), to = %to.display(), "relocated node");
        Ok(())
    }

    /// Remove a file or an empty directory.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path::canonicalize(path);

        let is_dir = match self.files.get(&path) {
            Some(node) => node.read().is_dir(),
            None => return Err(StoreError::not_found(path::display(&path))),
        };
        if is_dir && self.has_children(&path) {
            return Err(StoreError::directory_not_empty(path::display(&path)));
        }

        self.discard(&path);
        debug!(path = %path.display(), "removed node");
        Ok(())
    }

    /// Unconditionally drop `path` from both indices.
    fn discard(&mut self, path: &Path) {
        self.files.remove(path);
        self.children.remove(path);
        self.detach(path);
    }

    fn has_children(&self, path: &Path) -> bool {
        self.children
            .get(path)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Number of nodes, directories included.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sorted snapshot of every canonical path in the namespace.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.keys().cloned().collect();
        paths.sort();
        paths
    }
}
