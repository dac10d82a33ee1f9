//! Brick map data structures and operations
//!
//! This module defines the index tree that maps an archive's virtual paths to
//! the bricks holding their content:
//!
//! - **[`BrickMap`]**: the mutable index with path-based CRUD, listing and
//!   metadata operations
//! - **[`Node`]**: a directory or a file inside the tree
//! - **[`BrickRef`]**: a reference to one brick (hash link, checksum, optional
//!   size and key)
//! - **[`Metadata`]**: free-form per-node metadata including timestamps and the
//!   tombstone marker
//! - **[`BrickMapDiff`]**: an ordered log of mutations that can be replayed
//!   onto another map
//!
//! # Architecture
//!
//! ## Header tree
//!
//! ```text
//! header (directory, unnamed)
//!     |
//!     +-- docs (directory)
//!     |     |
//!     |     +-- a.txt (file) --> [brick h1, brick h2]
//!     |     +-- old.txt (file, deletedAt set) --> []
//!     |
//!     +-- readme (file) --> [brick h3]
//! ```
//!
//! ## Tombstones
//!
//! Deleting a node never removes it. The node keeps its place in the tree,
//! loses its content and gains a `deletedAt` stamp. Any later write through
//! the same path resurrects it along with every tombstoned ancestor.
//!
//! ## Serialization
//!
//! The header is written as a versioned JSON envelope (see [`encode_header`]).
//! Brick keys inside the header are base64 strings, so a round trip through
//! serialize and load is lossless.

mod brick_map;
mod codec;
mod diff;
mod metadata;
mod mutate;
mod node;
mod query;

pub mod path;
pub mod tree;

pub use brick_map::{BrickMap, BrickMapError, MapSource};
pub use codec::{decode_header, encode_header, CodecError, SCHEMA_VERSION};
pub use diff::{BrickMapDiff, DiffEntry, DiffOperation};
pub use metadata::{Metadata, CREATED_AT, DELETED_AT, UPDATED_AT};
pub use node::{BrickRef, Directory, File, Node, NodeKind, Stat};
pub use tree::TrailingNode;
