use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::hash_link::HashLink;
use super::store::{BrickError, BrickStore};

/// In-memory brick store using a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryBrickStore {
    inner: Arc<RwLock<HashMap<HashLink, Bytes>>>,
}

impl MemoryBrickStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct bricks held
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop a brick, returning whether it was present
    pub fn remove(&self, hash_link: &HashLink) -> bool {
        self.inner.write().remove(hash_link).is_some()
    }
}

#[async_trait]
impl BrickStore for MemoryBrickStore {
    async fn put(&self, raw: Bytes) -> Result<HashLink, BrickError> {
        let hash_link = HashLink::digest(&raw);
        tracing::trace!("storing brick {} ({} bytes)", hash_link, raw.len());
        self.inner.write().insert(hash_link.clone(), raw);
        Ok(hash_link)
    }

    async fn get(&self, hash_link: &HashLink) -> Result<Bytes, BrickError> {
        self.inner
            .read()
            .get(hash_link)
            .cloned()
            .ok_or_else(|| BrickError::NotFound(hash_link.clone()))
    }

    async fn has(&self, hash_link: &HashLink) -> Result<bool, BrickError> {
        Ok(self.inner.read().contains_key(hash_link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryBrickStore::new();
        let link = store.put(Bytes::from_static(b"data")).await.unwrap();

        assert_eq!(link, HashLink::digest(b"data"));
        assert!(store.has(&link).await.unwrap());
        assert_eq!(store.get(&link).await.unwrap(), Bytes::from_static(b"data"));
    }

    #[tokio::test]
    async fn test_dedup() {
        let store = MemoryBrickStore::new();
        store.put(Bytes::from_static(b"same")).await.unwrap();
        store.put(Bytes::from_static(b"same")).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing() {
        let store = MemoryBrickStore::new();
        let result = store.get(&HashLink::from("missing")).await;
        assert!(matches!(result, Err(BrickError::NotFound(_))));
    }
}
