//! Operation log of brick map mutations
//!
//! A [`BrickMapDiff`] records mutations in order so they can be shipped as a
//! single unit and replayed onto another map with [`BrickMap::apply_diff`].
//! The log is serialized with the same versioned envelope as headers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::brick::Brick;
use crate::config::ClockConfig;
use crate::crypto::KeyIdentity;

use super::brick_map::{BrickMap, BrickMapError};
use super::codec::{self, CodecError};
use super::metadata::Metadata;
use super::node::BrickRef;

const OPERATIONS_FIELD: &str = "operations";

/// A single recorded mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DiffOperation {
    Add { path: String, brick: BrickRef },
    AddFileEntry { path: String, bricks: Vec<BrickRef> },
    AppendBricks { path: String, bricks: Vec<BrickRef> },
    Truncate { path: String },
    Delete { path: String },
    Copy { src: String, dst: String },
    Rename { src: String, dst: String },
    CreateFolder { path: String },
    CreateFile { path: String },
    SetMetadata { path: String, metadata: Metadata },
    UpdateMetadata { path: String, key: String, value: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub timestamp: i64,
    pub operation: DiffOperation,
}

/// Two diffs are equal when they hold the same entries; the clock only
///  stamps new entries and is not serialized.
#[derive(Debug, Clone, Default)]
pub struct BrickMapDiff {
    entries: Vec<DiffEntry>,
    clock: ClockConfig,
}

impl PartialEq for BrickMapDiff {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl BrickMapDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: ClockConfig) -> Self {
        Self {
            entries: Vec::new(),
            clock,
        }
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, operation: DiffOperation) {
        self.entries.push(DiffEntry {
            timestamp: self.clock.now_millis(),
            operation,
        });
    }

    pub fn add(&mut self, path: &str, brick: BrickRef) {
        self.record(DiffOperation::Add {
            path: path.to_string(),
            brick,
        });
    }

    pub fn add_file_entry(&mut self, path: &str, bricks: impl IntoIterator<Item = BrickRef>) {
        self.record(DiffOperation::AddFileEntry {
            path: path.to_string(),
            bricks: bricks.into_iter().collect(),
        });
    }

    pub fn append_bricks(&mut self, path: &str, bricks: impl IntoIterator<Item = BrickRef>) {
        self.record(DiffOperation::AppendBricks {
            path: path.to_string(),
            bricks: bricks.into_iter().collect(),
        });
    }

    pub fn truncate(&mut self, path: &str) {
        self.record(DiffOperation::Truncate {
            path: path.to_string(),
        });
    }

    pub fn delete(&mut self, path: &str) {
        self.record(DiffOperation::Delete {
            path: path.to_string(),
        });
    }

    pub fn copy(&mut self, src: &str, dst: &str) {
        self.record(DiffOperation::Copy {
            src: src.to_string(),
            dst: dst.to_string(),
        });
    }

    pub fn rename(&mut self, src: &str, dst: &str) {
        self.record(DiffOperation::Rename {
            src: src.to_string(),
            dst: dst.to_string(),
        });
    }

    pub fn create_folder(&mut self, path: &str) {
        self.record(DiffOperation::CreateFolder {
            path: path.to_string(),
        });
    }

    pub fn create_file(&mut self, path: &str) {
        self.record(DiffOperation::CreateFile {
            path: path.to_string(),
        });
    }

    pub fn set_metadata(&mut self, path: &str, metadata: Metadata) {
        self.record(DiffOperation::SetMetadata {
            path: path.to_string(),
            metadata,
        });
    }

    pub fn update_metadata(&mut self, path: &str, key: &str, value: impl Into<Value>) {
        self.record(DiffOperation::UpdateMetadata {
            path: path.to_string(),
            key: key.to_string(),
            value: value.into(),
        });
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(OPERATIONS_FIELD, &self.entries, false)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, CodecError> {
        let entries: Vec<DiffEntry> = codec::decode(OPERATIONS_FIELD, raw)?;
        Ok(Self {
            entries,
            clock: ClockConfig::default(),
        })
    }

    /// Wrap the serialized log as a content-addressed unit
    pub fn to_brick(&self, key: KeyIdentity) -> Result<Brick, CodecError> {
        Ok(Brick::new(Bytes::from(self.to_bytes()?)).with_key(key))
    }
}

impl BrickMap {
    /// Replay every operation of `diff` in order
    ///
    /// Stops at the first failing operation; operations before it stay
    ///  applied.
    pub fn apply_diff(&mut self, diff: &BrickMapDiff) -> Result<(), BrickMapError> {
        tracing::debug!("applying diff with {} operations", diff.len());
        for entry in diff.entries() {
            self.apply_operation(&entry.operation)?;
        }
        Ok(())
    }

    pub fn apply_operation(&mut self, operation: &DiffOperation) -> Result<(), BrickMapError> {
        match operation {
            DiffOperation::Add { path, brick } => self.add(path, brick.clone()),
            DiffOperation::AddFileEntry { path, bricks } => {
                self.add_file_entry(path, bricks.iter().cloned())
            }
            DiffOperation::AppendBricks { path, bricks } => {
                self.append_bricks_to_file(path, bricks.iter().cloned())
            }
            DiffOperation::Truncate { path } => self.truncate(path),
            DiffOperation::Delete { path } => self.delete(path),
            DiffOperation::Copy { src, dst } => self.copy(src, dst),
            DiffOperation::Rename { src, dst } => self.rename(src, dst),
            DiffOperation::CreateFolder { path } => self.create_folder(path),
            DiffOperation::CreateFile { path } => self.create_file(path),
            DiffOperation::SetMetadata { path, metadata } => self.set_metadata(path, metadata.clone()),
            DiffOperation::UpdateMetadata { path, key, value } => {
                self.update_metadata(path, key, value.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_with_clock() {
        let mut diff = BrickMapDiff::with_clock(ClockConfig::Fixed { millis: 7 });
        diff.add("f", BrickRef::new("h1", "c1"));
        diff.delete("f");

        assert_eq!(diff.len(), 2);
        assert!(diff.entries().iter().all(|entry| entry.timestamp == 7));
    }

    #[test]
    fn test_operation_json_shape() {
        let operation = DiffOperation::Copy {
            src: "a".to_string(),
            dst: "b".to_string(),
        };
        let json = serde_json::to_value(&operation).unwrap();
        assert_eq!(json, serde_json::json!({ "op": "copy", "src": "a", "dst": "b" }));

        let operation = DiffOperation::CreateFolder {
            path: "d".to_string(),
        };
        let json = serde_json::to_value(&operation).unwrap();
        assert_eq!(json["op"], "createFolder");
    }

    #[test]
    fn test_bytes_roundtrip_keeps_keys() {
        let mut diff = BrickMapDiff::new();
        diff.add_file_entry("f", [BrickRef::new("h1", "c1").with_key(vec![4u8, 5])]);
        diff.update_metadata("f", "tag", "x");

        let decoded = BrickMapDiff::from_bytes(&diff.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.entries(), diff.entries());
    }

    #[test]
    fn test_decoded_diff_equals_fixed_clock_original() {
        let mut diff = BrickMapDiff::with_clock(ClockConfig::Fixed { millis: 9 });
        diff.create_folder("d");
        diff.rename("d", "e");

        let decoded = BrickMapDiff::from_bytes(&diff.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, diff);

        let mut longer = decoded.clone();
        longer.truncate("e");
        assert_ne!(longer, diff);
    }
}
