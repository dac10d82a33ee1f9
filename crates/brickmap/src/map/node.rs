use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brick::HashLink;
use crate::crypto::KeyBytes;

use super::metadata::Metadata;

/*
 * Nodes
 * =====
 * A brick map is a tree of nodes rooted at an unnamed header directory.
 *  - Directories map child names to nodes
 *  - Files hold an ordered list of brick references; the order is the
 *     order in which brick contents concatenate back into the file
 * Both carry free-form metadata. A node with `deletedAt` set is a
 *  tombstone: still present in its parent, but with its content dropped.
 */

/// Reference to a single stored brick
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickRef {
    hash_link: HashLink,
    check_sum: String,
    #[serde(default)]
    size: Option<u64>,
    // per-brick encryption key, overrides the map's template key
    #[serde(default)]
    key: Option<KeyBytes>,
}

impl BrickRef {
    pub fn new(hash_link: impl Into<HashLink>, check_sum: impl Into<String>) -> Self {
        Self {
            hash_link: hash_link.into(),
            check_sum: check_sum.into(),
            size: None,
            key: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_key(mut self, key: impl Into<KeyBytes>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn hash_link(&self) -> &HashLink {
        &self.hash_link
    }

    pub fn check_sum(&self) -> &str {
        &self.check_sum
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    pub fn set_size(&mut self, size: Option<u64>) {
        self.size = size;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    #[serde(default)]
    items: BTreeMap<String, Node>,
}

impl Directory {
    pub fn items(&self) -> &BTreeMap<String, Node> {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.items.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.items.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items_mut(&mut self) -> &mut BTreeMap<String, Node> {
        &mut self.items
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct File {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    #[serde(default, rename = "hashLinks")]
    hash_links: Vec<BrickRef>,
}

impl File {
    pub fn bricks(&self) -> &[BrickRef] {
        &self.hash_links
    }

    pub fn len(&self) -> usize {
        self.hash_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash_links.is_empty()
    }

    pub(crate) fn bricks_mut(&mut self) -> &mut Vec<BrickRef> {
        &mut self.hash_links
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Default for Node {
    fn default() -> Self {
        Node::Directory(Directory::default())
    }
}

impl Node {
    /// A fresh, empty node of the given kind stamped with `createdAt`
    pub(crate) fn empty(kind: NodeKind, now: i64) -> Self {
        let mut metadata = Metadata::new();
        metadata.stamp_created(now);
        match kind {
            NodeKind::Directory => Node::Directory(Directory {
                metadata: Some(metadata),
                items: BTreeMap::new(),
            }),
            NodeKind::File => Node::File(File {
                metadata: Some(metadata),
                hash_links: Vec::new(),
            }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory(_) => NodeKind::Directory,
            Node::File(_) => NodeKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(directory) => Some(directory),
            Node::File(_) => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut Directory> {
        match self {
            Node::Directory(directory) => Some(directory),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Node::Directory(directory) => directory.metadata.as_ref(),
            Node::File(file) => file.metadata.as_ref(),
        }
    }

    /// Metadata for mutation, created empty if the node has none
    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        let slot = match self {
            Node::Directory(directory) => &mut directory.metadata,
            Node::File(file) => &mut file.metadata,
        };
        slot.get_or_insert_with(Metadata::new)
    }

    pub(crate) fn set_metadata(&mut self, metadata: Metadata) {
        let slot = match self {
            Node::Directory(directory) => &mut directory.metadata,
            Node::File(file) => &mut file.metadata,
        };
        *slot = Some(metadata);
    }

    pub fn is_deleted(&self) -> bool {
        self.metadata().is_some_and(Metadata::is_deleted)
    }

    /// No children for directories, no brick references for files
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Directory(directory) => directory.is_empty(),
            Node::File(file) => file.is_empty(),
        }
    }

    pub(crate) fn clear_content(&mut self) {
        match self {
            Node::Directory(directory) => directory.items.clear(),
            Node::File(file) => file.hash_links.clear(),
        }
    }

    pub(crate) fn touch(&mut self, now: i64) {
        self.metadata_mut().stamp_updated(now);
    }

    /// Clear a tombstone if one is present, returning whether it was
    pub(crate) fn resurrect(&mut self, now: i64) -> bool {
        if !self.is_deleted() {
            return false;
        }
        let metadata = self.metadata_mut();
        metadata.clear_deleted();
        metadata.stamp_updated(now);
        true
    }

    /// Mark as deleted and drop all content
    pub(crate) fn tombstone(&mut self, now: i64) {
        self.clear_content();
        self.metadata_mut().mark_deleted(now);
    }

    /// Take over the content of `source`, which must be the same kind.
    ///  Returns false, leaving `self` untouched, on a kind mismatch.
    pub(crate) fn adopt_content(&mut self, source: Node) -> bool {
        match (self, source) {
            (Node::Directory(target), Node::Directory(source)) => {
                target.items = source.items;
                true
            }
            (Node::File(target), Node::File(source)) => {
                target.hash_links = source.hash_links;
                true
            }
            _ => false,
        }
    }
}

/// Summary of a node returned by `stat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Stat {
    pub(crate) fn of(node: &Node) -> Self {
        let metadata = node.metadata();
        Self {
            kind: node.kind(),
            deleted: node.is_deleted(),
            created_at: metadata.and_then(Metadata::created_at),
            updated_at: metadata.and_then(Metadata::updated_at),
        }
    }
}
