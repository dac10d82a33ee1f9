use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::crypto::KeyIdentity;

use super::hash_link::HashLink;
use super::store::{BrickError, BrickStore};

/// A content-addressed unit of raw bytes
///
/// Reading raw bytes and computing the hash link are asynchronous since a
/// unit may be backed by remote or on-disk storage.
#[async_trait]
pub trait ContentUnit: Send + Sync + Debug {
    /// Replace the raw bytes held by this unit
    fn set_raw(&mut self, raw: Bytes);

    /// Get the raw bytes of this unit
    async fn raw(&self) -> Result<Bytes, BrickError>;

    /// Compute the content-hash identifier of this unit
    async fn hash_link(&self) -> Result<HashLink, BrickError> {
        let raw = self.raw().await?;
        Ok(HashLink::digest(&raw))
    }

    fn key_identity(&self) -> Option<&KeyIdentity>;

    fn set_key_identity(&mut self, key: KeyIdentity);
}

/// An in-memory content-addressed unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Brick {
    raw: Option<Bytes>,
    key: Option<KeyIdentity>,
}

impl Brick {
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self {
            raw: Some(raw.into()),
            key: None,
        }
    }

    pub fn with_key(mut self, key: KeyIdentity) -> Self {
        self.key = Some(key);
        self
    }

    /// Borrow the raw bytes without going through the async interface
    pub fn bytes(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }
}

#[async_trait]
impl ContentUnit for Brick {
    fn set_raw(&mut self, raw: Bytes) {
        self.raw = Some(raw);
    }

    async fn raw(&self) -> Result<Bytes, BrickError> {
        self.raw.clone().ok_or(BrickError::Empty)
    }

    fn key_identity(&self) -> Option<&KeyIdentity> {
        self.key.as_ref()
    }

    fn set_key_identity(&mut self, key: KeyIdentity) {
        self.key = Some(key);
    }
}

/// A unit whose raw bytes live in a [`BrickStore`]
///
/// Bytes are fetched on every [`ContentUnit::raw`] call until they are
/// overridden with [`ContentUnit::set_raw`].
#[derive(Debug, Clone)]
pub struct StoredBrick {
    hash_link: HashLink,
    store: Arc<dyn BrickStore>,
    raw: Option<Bytes>,
    key: Option<KeyIdentity>,
}

impl StoredBrick {
    pub fn new(hash_link: HashLink, store: Arc<dyn BrickStore>) -> Self {
        Self {
            hash_link,
            store,
            raw: None,
            key: None,
        }
    }

    pub fn with_key(mut self, key: KeyIdentity) -> Self {
        self.key = Some(key);
        self
    }
}

#[async_trait]
impl ContentUnit for StoredBrick {
    fn set_raw(&mut self, raw: Bytes) {
        self.raw = Some(raw);
    }

    async fn raw(&self) -> Result<Bytes, BrickError> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => self.store.get(&self.hash_link).await,
        }
    }

    async fn hash_link(&self) -> Result<HashLink, BrickError> {
        match &self.raw {
            Some(raw) => Ok(HashLink::digest(raw)),
            None => Ok(self.hash_link.clone()),
        }
    }

    fn key_identity(&self) -> Option<&KeyIdentity> {
        self.key.as_ref()
    }

    fn set_key_identity(&mut self, key: KeyIdentity) {
        self.key = Some(key);
    }
}
