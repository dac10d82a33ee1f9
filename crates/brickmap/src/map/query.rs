//! Read-only queries and metadata access on a [`BrickMap`]
//!
//! Lookups treat `""` and `"/"` as the root. Listings return canonical paths
//! (no leading separator) of live, non-tombstoned nodes.

use serde_json::Value;

use crate::brick::HashLink;

use super::brick_map::{required_path, BrickMap, BrickMapError};
use super::metadata::Metadata;
use super::node::{BrickRef, File, Node, NodeKind, Stat};
use super::path;
use super::tree;

impl BrickMap {
    /// The node at `path`, if any
    pub fn get_node(&self, path: &str) -> Option<&Node> {
        tree::navigate(self.header(), path)
    }

    /// Node present and not tombstoned
    pub fn file_exists(&self, path: &str) -> bool {
        self.get_node(path).is_some_and(|node| !node.is_deleted())
    }

    /// Node present and tombstoned
    pub fn file_deleted(&self, path: &str) -> bool {
        self.get_node(path).is_some_and(Node::is_deleted)
    }

    /// A missing node counts as empty
    pub fn is_empty(&self, path: &str) -> bool {
        self.get_node(path).map_or(true, Node::is_empty)
    }

    pub fn stat(&self, path: &str) -> Result<Stat, BrickMapError> {
        self.get_node(path)
            .map(Stat::of)
            .ok_or_else(|| BrickMapError::NotFound(path::normalize(path)))
    }

    /// The ordered brick references of a live file
    ///
    /// # Errors
    ///
    /// - `NotFound` - nothing at `path`, or the file is tombstoned
    /// - `IsDirectory` - `path` is a directory
    pub fn get_bricks_meta(&self, path: &str) -> Result<&[BrickRef], BrickMapError> {
        Ok(self.live_file(path)?.bricks())
    }

    /// Just the hash links of a file's brick references, in order
    pub fn get_hash_list(&self, path: &str) -> Result<Vec<HashLink>, BrickMapError> {
        let path = required_path(path)?;
        Ok(self
            .live_file(&path)?
            .bricks()
            .iter()
            .map(|brick| brick.hash_link().clone())
            .collect())
    }

    /// The last brick reference of a live file, if it has any
    pub fn get_last_brick(&self, path: &str) -> Result<Option<&BrickRef>, BrickMapError> {
        Ok(self.live_file(path)?.bricks().last())
    }

    /// Sum of the recorded brick sizes of a live file; bricks without a
    ///  size count as zero
    pub fn get_file_size(&self, path: &str) -> Result<u64, BrickMapError> {
        Ok(self
            .live_file(path)?
            .bricks()
            .iter()
            .filter_map(BrickRef::size)
            .sum())
    }

    fn live_file(&self, path: &str) -> Result<&File, BrickMapError> {
        let normalized = path::normalize(path);
        let node = self
            .get_node(&normalized)
            .filter(|node| !node.is_deleted())
            .ok_or_else(|| BrickMapError::NotFound(normalized.clone()))?;
        node.as_file()
            .ok_or(BrickMapError::IsDirectory(normalized))
    }

    /// Paths of live files under `path`
    ///
    /// Directories are never listed themselves. With `recursive` unset only
    ///  the immediate children are inspected.
    pub fn get_file_list(
        &self,
        path: &str,
        recursive: bool,
    ) -> Result<Vec<String>, BrickMapError> {
        self.list(path, recursive, NodeKind::File)
    }

    /// Paths of live directories under `path`
    pub fn get_folder_list(
        &self,
        path: &str,
        recursive: bool,
    ) -> Result<Vec<String>, BrickMapError> {
        self.list(path, recursive, NodeKind::Directory)
    }

    fn list(
        &self,
        path: &str,
        recursive: bool,
        kind: NodeKind,
    ) -> Result<Vec<String>, BrickMapError> {
        let normalized = path::normalize(path);
        let node = self
            .get_node(&normalized)
            .ok_or_else(|| BrickMapError::NotFound(normalized.clone()))?;
        if node.is_file() {
            return Err(BrickMapError::IsFile(normalized));
        }

        let mut out = Vec::new();
        collect(node, &normalized, recursive, kind, &mut out);
        Ok(out)
    }

    /// The metadata of the node at `path`
    ///
    /// # Errors
    ///
    /// - `NotFound` - nothing at `path`
    /// - `NoMetadata` - the node carries no metadata
    pub fn get_metadata(&self, path: &str) -> Result<&Metadata, BrickMapError> {
        let normalized = path::normalize(path);
        let node = self
            .get_node(&normalized)
            .ok_or_else(|| BrickMapError::NotFound(normalized.clone()))?;
        node.metadata()
            .ok_or(BrickMapError::NoMetadata(normalized))
    }

    /// Replace the whole metadata mapping of the node at `path`
    pub fn set_metadata(&mut self, path: &str, metadata: Metadata) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let node = tree::navigate_mut(self.header_mut(), &path)
            .ok_or_else(|| BrickMapError::NotFound(path.clone()))?;
        node.set_metadata(metadata);
        Ok(())
    }

    /// Set a single metadata key on the node at `path`
    pub fn update_metadata(
        &mut self,
        path: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), BrickMapError> {
        let path = required_path(path)?;
        let node = tree::navigate_mut(self.header_mut(), &path)
            .ok_or_else(|| BrickMapError::NotFound(path.clone()))?;
        node.metadata_mut().insert(key, value);
        Ok(())
    }
}

fn collect(node: &Node, prefix: &str, recursive: bool, kind: NodeKind, out: &mut Vec<String>) {
    let Some(directory) = node.as_directory() else {
        return;
    };
    for (name, child) in directory.items() {
        let child_path = path::join(prefix, name);
        if child.kind() == kind && !child.is_deleted() {
            out.push(child_path.clone());
        }
        // tombstoned directories still recurse; their content is already gone
        if recursive && child.is_directory() {
            collect(child, &child_path, recursive, kind, out);
        }
    }
}
