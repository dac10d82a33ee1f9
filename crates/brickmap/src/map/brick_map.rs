use std::sync::Arc;

use bytes::Bytes;

use crate::brick::{Brick, BrickError, BrickStore, ContentUnit, HashLink, StoredBrick};
use crate::config::Config;
use crate::crypto::KeyIdentity;

use super::codec::{self, CodecError};
use super::node::{BrickRef, Node, NodeKind};
use super::path;

#[derive(Debug, thiserror::Error)]
pub enum BrickMapError {
    #[error("default error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("path is empty")]
    EmptyPath,
    #[error("path not found: {0}")]
    NotFound(String),
    #[error("path is a directory: {0}")]
    IsDirectory(String),
    #[error("path is a file: {0}")]
    IsFile(String),
    #[error("path has no metadata: {0}")]
    NoMetadata(String),
    #[error("name conflict: {0}")]
    NameConflict(String),
    #[error("invalid folder name: {0}")]
    InvalidFolderName(String),
    #[error("cannot move '{from}' to '{to}': destination is inside source")]
    MoveIntoSelf { from: String, to: String },
    #[error("cannot move '{from}' to '{to}': destination contains source")]
    MoveOntoAncestor { from: String, to: String },
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("failed to fetch brick map bytes: {0}")]
    Load(#[source] BrickError),
    #[error("failed to store brick map bytes: {0}")]
    Store(#[source] BrickError),
}

/// Anything a brick map can be loaded from
#[derive(Debug)]
pub enum MapSource<'a> {
    /// A content-addressed unit; its raw bytes are fetched, then parsed
    Unit(&'a dyn ContentUnit),
    /// Raw envelope bytes
    Bytes(Bytes),
    /// Envelope JSON text
    Text(String),
    /// An already materialized header, taken as is
    Header(Node),
}

/// The index tree of an archive
///
/// Maps virtual paths to ordered sequences of brick references. The tree is
///  rooted at `header`, an unnamed directory. `template_key` is the key
///  identity used to address and encrypt the map's own serialized form.
///
/// A brick map is a plain value: it holds no locks and callers serialize
///  mutation. Path operations are synchronous; only loading (and the clone
///  and hash helpers built on serialization) await I/O.
#[derive(Debug, Clone)]
pub struct BrickMap {
    header: Node,
    template_key: KeyIdentity,
    config: Config,
}

impl BrickMap {
    /// An empty map with the default config
    pub fn new(template_key: KeyIdentity) -> Self {
        Self::with_config(template_key, Config::default())
    }

    pub fn with_config(template_key: KeyIdentity, config: Config) -> Self {
        let now = config.clock.now_millis();
        Self {
            header: Node::empty(NodeKind::Directory, now),
            template_key,
            config,
        }
    }

    /// Build a map and load its header from `source`
    pub async fn from_source(
        source: MapSource<'_>,
        template_key: KeyIdentity,
        config: Config,
    ) -> Result<Self, BrickMapError> {
        let mut map = Self::with_config(template_key, config);
        map.load(source).await?;
        Ok(map)
    }

    /// Load a map previously saved to a store
    pub async fn open(
        hash_link: &HashLink,
        store: Arc<dyn BrickStore>,
        template_key: KeyIdentity,
        config: Config,
    ) -> Result<Self, BrickMapError> {
        let unit = StoredBrick::new(hash_link.clone(), store).with_key(template_key.clone());
        Self::from_source(MapSource::Unit(&unit), template_key, config).await
    }

    /// Borrow the header tree
    pub fn header(&self) -> &Node {
        &self.header
    }

    /// A deep snapshot of the header for external inspection
    pub fn get_state(&self) -> Node {
        self.header.clone()
    }

    pub fn template_key_identity(&self) -> &KeyIdentity {
        &self.template_key
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn now(&self) -> i64 {
        self.config.clock.now_millis()
    }

    pub(crate) fn header_mut(&mut self) -> &mut Node {
        &mut self.header
    }

    /// Encode the header as envelope JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, BrickMapError> {
        Ok(codec::encode_header(&self.header, self.config.pretty)?)
    }

    /// Wrap the serialized header as a content-addressed unit carrying
    ///  this map's template key identity
    pub fn serialize(&self) -> Result<Brick, BrickMapError> {
        let bytes = self.to_bytes()?;
        tracing::debug!("serialized brick map header ({} bytes)", bytes.len());
        Ok(Brick::new(bytes).with_key(self.template_key.clone()))
    }

    /// Replace the header with one read from `source`.
    ///
    /// The current header is only replaced once the new one fully decoded;
    ///  on error the map is left untouched.
    pub async fn load(&mut self, source: MapSource<'_>) -> Result<(), BrickMapError> {
        let header = match source {
            MapSource::Unit(unit) => {
                let raw = unit.raw().await.map_err(|e| {
                    tracing::warn!("failed to fetch brick map bytes: {}", e);
                    BrickMapError::Load(e)
                })?;
                tracing::debug!("loading brick map from unit ({} bytes)", raw.len());
                codec::decode_header(&raw)
            }
            MapSource::Bytes(raw) => codec::decode_header(&raw),
            MapSource::Text(text) => codec::decode_header(text.as_bytes()),
            MapSource::Header(header) if header.is_directory() => Ok(header),
            MapSource::Header(_) => Err(CodecError::RootNotDirectory),
        }
        .map_err(|e| {
            tracing::warn!("rejecting brick map header: {}", e);
            BrickMapError::Codec(e)
        })?;
        self.header = header;
        Ok(())
    }

    /// An independent copy of this map, produced by serializing and
    ///  loading the header
    pub async fn clone_map(&self) -> Result<BrickMap, BrickMapError> {
        let brick = self.serialize()?;
        let clone = Self::from_source(
            MapSource::Unit(&brick),
            self.template_key.clone(),
            self.config.clone(),
        )
        .await?;
        tracing::debug!("cloned brick map");
        Ok(clone)
    }

    /// Content-hash identifier of the serialized header
    pub async fn get_hash_link(&self) -> Result<HashLink, BrickMapError> {
        let brick = self.serialize()?;
        brick.hash_link().await.map_err(BrickMapError::Load)
    }

    /// Serialize and put the header into a store
    pub async fn save(&self, store: &dyn BrickStore) -> Result<HashLink, BrickMapError> {
        let bytes = self.to_bytes()?;
        let hash_link = store
            .put(Bytes::from(bytes))
            .await
            .map_err(BrickMapError::Store)?;
        tracing::debug!("saved brick map as {}", hash_link);
        Ok(hash_link)
    }

    /// The key identity needed to decrypt a brick: its own key if the
    ///  reference carries one, otherwise the map's template key
    pub fn resolve_brick_key_identity(&self, brick: &BrickRef) -> KeyIdentity {
        match brick.key() {
            Some(key) => KeyIdentity::from_bytes(key),
            None => self.template_key.clone(),
        }
    }
}

/// Normalize a path for a mutating operation, rejecting the root
pub(crate) fn required_path(raw: &str) -> Result<String, BrickMapError> {
    let normalized = path::normalize(raw);
    if normalized.is_empty() {
        return Err(BrickMapError::EmptyPath);
    }
    Ok(normalized)
}
