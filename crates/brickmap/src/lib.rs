/**
 * Content-addressed units and the stores
 *  that hold them.
 */
pub mod brick;
/**
 * Per-instance tunables: header formatting
 *  and the clock used for node timestamps.
 */
pub mod config;
/**
 * Key identities and the binary-safe
 *  encoding of raw key bytes.
 */
pub mod crypto;
/**
 * The brick map itself: the path tree,
 *  its mutations, queries, serialization
 *  and diff log.
 */
pub mod map;

pub mod prelude {
    pub use crate::brick::{Brick, BrickStore, ContentUnit, HashLink, MemoryBrickStore};
    pub use crate::config::{ClockConfig, Config};
    pub use crate::crypto::KeyIdentity;
    pub use crate::map::{BrickMap, BrickMapDiff, BrickMapError, BrickRef, MapSource, Metadata};
}
