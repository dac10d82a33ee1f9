//! Mutating path operations on a [`BrickMap`]
//!
//! Every operation here normalizes its path first and rejects the root with
//! [`BrickMapError::EmptyPath`]. Content is never physically removed from a
//! parent: deletion leaves a tombstone, and only a directory copy replaces a
//! subtree wholesale.

use super::brick_map::{required_path, BrickMap, BrickMapError};
use super::node::{BrickRef, NodeKind};
use super::path;
use super::tree::{self, TrailingNode};

impl BrickMap {
    /// Append a single brick reference to the file at `path`, creating the
    ///  file and any missing parent directories
    pub fn add(&mut self, path: &str, brick: BrickRef) -> Result<(), BrickMapError> {
        self.append_bricks_to_file(path, [brick])
    }

    /// Replace the content of the file at `path` with `bricks`
    ///
    /// Accepts anything iterable, so a single brick can be passed as `[brick]`.
    pub fn add_file_entry(
        &mut self,
        path: &str,
        bricks: impl IntoIterator<Item = BrickRef>,
    ) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let (is_directory, has_content) = match tree::navigate(self.header(), &path) {
            Some(existing) => (existing.is_directory(), !existing.is_empty()),
            None => (false, false),
        };
        if is_directory {
            return Err(BrickMapError::IsDirectory(path));
        }
        if has_content {
            self.truncate(&path)?;
        }
        self.append_bricks_to_file(&path, bricks)
    }

    /// Append `bricks` to the file at `path` without truncating it
    pub fn append_bricks_to_file(
        &mut self,
        path: &str,
        bricks: impl IntoIterator<Item = BrickRef>,
    ) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let now = self.now();
        let node = tree::materialize(self.header_mut(), &path, TrailingNode::Child, now)?;
        let file = node
            .as_file_mut()
            .ok_or_else(|| BrickMapError::IsDirectory(path.clone()))?;
        let before = file.len();
        file.bricks_mut().extend(bricks);
        tracing::trace!("appended {} bricks to {}", file.len() - before, path);
        node.touch(now);
        Ok(())
    }

    /// Substitute the first brick reference of a file; no-op if it has none
    pub fn replace_first_brick(
        &mut self,
        path: &str,
        brick: BrickRef,
    ) -> Result<(), BrickMapError> {
        self.replace_brick(path, brick, |bricks| bricks.first_mut())
    }

    /// Substitute the last brick reference of a file; no-op if it has none
    pub fn replace_last_brick(
        &mut self,
        path: &str,
        brick: BrickRef,
    ) -> Result<(), BrickMapError> {
        self.replace_brick(path, brick, |bricks| bricks.last_mut())
    }

    fn replace_brick<F>(
        &mut self,
        path: &str,
        brick: BrickRef,
        pick: F,
    ) -> Result<(), BrickMapError>
    where
        F: FnOnce(&mut Vec<BrickRef>) -> Option<&mut BrickRef>,
    {
        let path = required_path(path)?;
        let now = self.now();
        let node = tree::navigate_mut(self.header_mut(), &path)
            .ok_or_else(|| BrickMapError::NotFound(path.clone()))?;
        let file = node
            .as_file_mut()
            .ok_or_else(|| BrickMapError::IsDirectory(path.clone()))?;
        if let Some(slot) = pick(file.bricks_mut()) {
            *slot = brick;
            node.touch(now);
        }
        Ok(())
    }

    /// Soft-delete the node at `path`
    ///
    /// Idempotent: a missing or already deleted node is left alone. Otherwise
    ///  the node keeps its place in its parent, gains `deletedAt`, and loses
    ///  its content.
    pub fn delete(&mut self, path: &str) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let now = self.now();
        match tree::navigate_mut(self.header_mut(), &path) {
            Some(node) if !node.is_deleted() => {
                node.tombstone(now);
                tracing::trace!("tombstoned {}", path);
            }
            _ => {}
        }
        Ok(())
    }

    /// Reset the node at `path` to empty without removing it (the "empty
    ///  list" operation). Clears any tombstone.
    pub fn truncate(&mut self, path: &str) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let now = self.now();
        let node = tree::navigate_mut(self.header_mut(), &path)
            .ok_or_else(|| BrickMapError::NotFound(path.clone()))?;
        node.resurrect(now);
        node.clear_content();
        node.touch(now);
        Ok(())
    }

    /// Deep-copy the node at `src` to `dst`
    ///
    /// `dst` is materialized with the same kind as `src` and its content is
    ///  replaced by an independent copy of the source content. `dst` keeps
    ///  its own metadata.
    pub fn copy(&mut self, src: &str, dst: &str) -> Result<(), BrickMapError> {
        let src = path::normalize(src);
        let dst = required_path(dst)?;
        let source = tree::navigate(self.header(), &src)
            .filter(|node| !node.is_deleted())
            .cloned()
            .ok_or_else(|| BrickMapError::NotFound(src.clone()))?;

        let now = self.now();
        let target = tree::materialize(self.header_mut(), &dst, source.kind().into(), now)?;
        if !target.adopt_content(source) {
            return Err(BrickMapError::NameConflict(dst));
        }
        target.touch(now);
        tracing::trace!("copied {} to {}", src, dst);
        Ok(())
    }

    /// Move the node at `src` to `dst`: a copy followed by a delete of the
    ///  source, which stays behind as a tombstone
    pub fn rename(&mut self, src: &str, dst: &str) -> Result<(), BrickMapError> {
        let src = required_path(src)?;
        let dst = required_path(dst)?;
        if path::is_within(&dst, &src) {
            return Err(BrickMapError::MoveIntoSelf { from: src, to: dst });
        }
        // replacing an ancestor would drop the source before it is deleted
        if path::is_within(&src, &dst) {
            return Err(BrickMapError::MoveOntoAncestor { from: src, to: dst });
        }
        self.copy(&src, &dst)?;
        self.delete(&src)
    }

    /// Explicitly create a directory
    ///
    /// Idempotent for an existing directory (a tombstoned one is resurrected).
    ///
    /// # Errors
    ///
    /// - `EmptyPath` - path normalizes to the root
    /// - `InvalidFolderName` - the final segment is empty (`path` ends in `/`)
    /// - `NameConflict` - a file already sits at `path`, or an ancestor is a file
    pub fn create_folder(&mut self, raw: &str) -> Result<(), BrickMapError> {
        let path = required_path(raw)?;
        self.check_creatable(raw, &path, NodeKind::Directory)?;
        let now = self.now();
        tree::materialize_directory(self.header_mut(), &path, now)?;
        Ok(())
    }

    /// Explicitly create a file
    ///
    /// An existing file keeps its content; a tombstoned one is resurrected
    ///  empty.
    pub fn create_file(&mut self, raw: &str) -> Result<(), BrickMapError> {
        let path = required_path(raw)?;
        self.check_creatable(raw, &path, NodeKind::File)?;
        let now = self.now();
        tree::materialize_file(self.header_mut(), &path, now)?;
        Ok(())
    }

    /// `raw` is the path as given, `path` its normalized form
    fn check_creatable(&self, raw: &str, path: &str, kind: NodeKind) -> Result<(), BrickMapError> {
        let noun = kind_noun(kind);
        if raw.ends_with(path::SEPARATOR) {
            return Err(BrickMapError::InvalidFolderName(format!(
                "Missing {} name",
                noun
            )));
        }

        let parent = path::dirname(path);
        let (deepest, _) = tree::deepest(self.header(), &parent);
        if deepest.is_file() {
            return Err(BrickMapError::NameConflict(format!(
                "Unable to create a {} in a file",
                noun
            )));
        }

        match tree::navigate(self.header(), path) {
            Some(existing) if existing.kind() != kind => {
                Err(BrickMapError::NameConflict(format!(
                    "{}: a {} already exists at this location",
                    path,
                    kind_noun(existing.kind())
                )))
            }
            _ => Ok(()),
        }
    }
}

fn kind_noun(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Directory => "folder",
        NodeKind::File => "file",
    }
}
