use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";
pub const DELETED_AT: &str = "deletedAt";

/// Free-form node metadata
///
/// A mapping of string keys to JSON values. Three keys carry meaning for the
/// tree itself, all optional timestamps stored as milliseconds since the unix
/// epoch:
///
/// - `createdAt`: stamped when the node is first materialized
/// - `updatedAt`: stamped on every content mutation
/// - `deletedAt`: presence marks the node as a tombstone
///
/// Timestamp accessors also accept RFC 3339 strings, so metadata written by
/// other tools still reads back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(UPDATED_AT)
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(DELETED_AT)
    }

    /// Whether a tombstone marker is present
    pub fn is_deleted(&self) -> bool {
        self.0.get(DELETED_AT).is_some_and(|value| !value.is_null())
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.0.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub(crate) fn stamp_created(&mut self, millis: i64) {
        self.0.insert(CREATED_AT.to_string(), Value::from(millis));
        self.0.insert(UPDATED_AT.to_string(), Value::from(millis));
    }

    pub(crate) fn stamp_updated(&mut self, millis: i64) {
        self.0.insert(UPDATED_AT.to_string(), Value::from(millis));
    }

    pub(crate) fn mark_deleted(&mut self, millis: i64) {
        self.0.insert(DELETED_AT.to_string(), Value::from(millis));
        self.0.insert(UPDATED_AT.to_string(), Value::from(millis));
    }

    /// Remove the tombstone marker, returning whether one was present
    pub(crate) fn clear_deleted(&mut self) -> bool {
        self.0.remove(DELETED_AT).is_some()
    }
}

impl From<BTreeMap<String, Value>> for Metadata {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tombstone_lifecycle() {
        let mut metadata = Metadata::new();
        metadata.stamp_created(1_000);
        assert!(!metadata.is_deleted());

        metadata.mark_deleted(2_000);
        assert!(metadata.is_deleted());
        assert_eq!(metadata.deleted_at().unwrap().timestamp_millis(), 2_000);
        assert_eq!(metadata.updated_at().unwrap().timestamp_millis(), 2_000);

        assert!(metadata.clear_deleted());
        assert!(!metadata.clear_deleted());
        assert!(!metadata.is_deleted());
        assert_eq!(metadata.created_at().unwrap().timestamp_millis(), 1_000);
    }

    #[test]
    fn test_null_deleted_at_is_not_a_tombstone() {
        let mut metadata = Metadata::new();
        metadata.insert(DELETED_AT, Value::Null);
        assert!(!metadata.is_deleted());
    }

    #[test]
    fn test_rfc3339_timestamps() {
        let mut metadata = Metadata::new();
        metadata.insert(CREATED_AT, "2024-01-02T03:04:05Z");
        let created = metadata.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut metadata = Metadata::new();
        metadata.insert("author", "alice");
        metadata.stamp_updated(5);
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"author":"alice","updatedAt":5}"#);
    }
}
