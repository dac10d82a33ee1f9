use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use super::hash_link::HashLink;

#[derive(Debug, thiserror::Error)]
pub enum BrickError {
    #[error("default error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("brick not found: {0}")]
    NotFound(HashLink),
    #[error("brick has no raw data")]
    Empty,
    #[error("brick store error: {0}")]
    Store(String),
}

/// Backing storage for bricks, addressed by hash link.
///  Concrete backends (folder, single file, network) live
///  outside this crate; anything that can put and get raw
///  bytes by hash can back a brick map.
#[async_trait]
pub trait BrickStore: Send + Sync + Debug {
    /// Store raw bytes, returning their hash link
    async fn put(&self, raw: Bytes) -> Result<HashLink, BrickError>;

    /// Fetch the raw bytes stored under a hash link
    ///
    /// # Returns
    /// * `Ok(Bytes)` - The raw bytes of the brick
    /// * `Err(BrickError::NotFound)` - Nothing is stored under the link
    async fn get(&self, hash_link: &HashLink) -> Result<Bytes, BrickError>;

    /// Check whether the store holds a brick
    async fn has(&self, hash_link: &HashLink) -> Result<bool, BrickError>;
}
