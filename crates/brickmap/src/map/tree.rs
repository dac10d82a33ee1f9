//! Navigation and materialization over a node tree
//!
//! These are pure functions over an explicit root [`Node`]; the
//! [`BrickMap`](super::BrickMap) aggregate calls them against its header.

use super::brick_map::BrickMapError;
use super::node::{Directory, File, Node, NodeKind};
use super::path;

/// Kind of node to create for the final segment of a materialized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingNode {
    /// A file
    Child,
    /// A directory
    Parent,
}

impl TrailingNode {
    pub fn kind(self) -> NodeKind {
        match self {
            TrailingNode::Child => NodeKind::File,
            TrailingNode::Parent => NodeKind::Directory,
        }
    }
}

impl From<NodeKind> for TrailingNode {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => TrailingNode::Child,
            NodeKind::Directory => TrailingNode::Parent,
        }
    }
}

/// Resolve a path without mutating anything.
///
/// The root path (`""` or `"/"`) resolves to `root` itself. Traversal only
///  descends through directories: a path that continues past a file does
///  not resolve.
pub fn navigate<'a>(root: &'a Node, path: &str) -> Option<&'a Node> {
    let mut node = root;
    for segment in path::segments(path) {
        node = node.as_directory()?.get(segment)?;
    }
    Some(node)
}

pub fn navigate_mut<'a>(root: &'a mut Node, path: &str) -> Option<&'a mut Node> {
    let mut node = root;
    for segment in path::segments(path) {
        node = node.as_directory_mut()?.get_mut(segment)?;
    }
    Some(node)
}

/// Walk as far down `path` as the tree goes.
///
/// Returns the deepest existing node together with the number of segments
///  that resolved. Stops early at a file.
pub fn deepest<'a>(root: &'a Node, path: &str) -> (&'a Node, usize) {
    let mut node = root;
    let mut depth = 0;
    for segment in path::segments(path) {
        match node.as_directory().and_then(|directory| directory.get(segment)) {
            Some(child) => {
                node = child;
                depth += 1;
            }
            None => break,
        }
    }
    (node, depth)
}

/// Make sure every segment of `path` exists, creating what is missing.
///
/// Intermediate segments become directories. The final segment becomes a
///  file or a directory per `trailing`. Existing nodes along the way are
///  reused; any tombstone on them (or on the directory holding them) is
///  cleared. Nothing is rolled back if a later segment fails.
///
/// # Errors
///
/// - `EmptyPath` - the path has no segments
/// - `IsFile` - an intermediate segment names a file, or the trailing node
///   exists as a file where a directory was asked for
/// - `IsDirectory` - the trailing node exists as a directory where a file
///   was asked for
pub fn materialize<'a>(
    root: &'a mut Node,
    path: &str,
    trailing: TrailingNode,
    now: i64,
) -> Result<&'a mut Node, BrickMapError> {
    let segments = path::segments(path);
    let (last, parents) = segments.split_last().ok_or(BrickMapError::EmptyPath)?;

    let mut current = root;
    let mut walked = String::new();
    for segment in parents {
        walked = path::join(&walked, segment);
        current = descend(current, segment, NodeKind::Directory, &walked, now)?;
    }

    let full = path::join(&walked, last);
    descend(current, last, trailing.kind(), &full, now)
}

pub fn materialize_file<'a>(
    root: &'a mut Node,
    path: &str,
    now: i64,
) -> Result<&'a mut File, BrickMapError> {
    match materialize(root, path, TrailingNode::Child, now)? {
        Node::File(file) => Ok(file),
        Node::Directory(_) => Err(BrickMapError::IsDirectory(path::normalize(path))),
    }
}

pub fn materialize_directory<'a>(
    root: &'a mut Node,
    path: &str,
    now: i64,
) -> Result<&'a mut Directory, BrickMapError> {
    match materialize(root, path, TrailingNode::Parent, now)? {
        Node::Directory(directory) => Ok(directory),
        Node::File(_) => Err(BrickMapError::IsFile(path::normalize(path))),
    }
}

fn descend<'a>(
    current: &'a mut Node,
    name: &str,
    kind: NodeKind,
    location: &str,
    now: i64,
) -> Result<&'a mut Node, BrickMapError> {
    if current.resurrect(now) {
        tracing::trace!("resurrected directory above {}", location);
    }
    let directory = match current {
        Node::Directory(directory) => directory,
        Node::File(_) => return Err(BrickMapError::IsFile(path::dirname(location))),
    };

    let child = directory
        .items_mut()
        .entry(name.to_string())
        .or_insert_with(|| {
            tracing::trace!("materializing {:?} at {}", kind, location);
            Node::empty(kind, now)
        });

    match (child.kind(), kind) {
        (NodeKind::Directory, NodeKind::File) => {
            return Err(BrickMapError::IsDirectory(location.to_string()))
        }
        (NodeKind::File, NodeKind::Directory) => {
            return Err(BrickMapError::IsFile(location.to_string()))
        }
        _ => {}
    }

    if child.resurrect(now) {
        tracing::trace!("resurrected {}", location);
    }
    Ok(child)
}
