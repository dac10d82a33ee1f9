//! Content-addressed units
//!
//! A brick is an immutable, content-addressed blob of archive data. The brick
//! map itself only stores references to bricks, but its own serialized header
//! is also wrapped as a content-addressed unit so archives can link to one
//! another by hash.
//!
//! - **[`HashLink`]**: BLAKE3 content hash identifier (lowercase hex)
//! - **[`ContentUnit`]**: the collaborator interface a brick map reads from and
//!   writes to (raw bytes, hash, key identity)
//! - **[`Brick`]**: an in-memory unit holding its raw bytes
//! - **[`StoredBrick`]**: a unit whose raw bytes are fetched lazily from a
//!   [`BrickStore`]
//! - **[`MemoryBrickStore`]**: a `HashMap`-backed store

mod hash_link;
mod memory;
mod store;
mod unit;

pub use hash_link::HashLink;
pub use memory::MemoryBrickStore;
pub use store::{BrickError, BrickStore};
pub use unit::{Brick, ContentUnit, StoredBrick};
