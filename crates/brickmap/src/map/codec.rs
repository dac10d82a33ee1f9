//! Versioned JSON envelope for serialized brick map state
//!
//! ```text
//! { "version": 1, "keyEncoding": "base64", "<body field>": ... }
//! ```
//!
//! The envelope is checked before the body is decoded, so a future schema
//! fails with a clear error instead of a confusing parse failure.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::crypto::KEY_ENCODING;

use super::node::Node;

pub const SCHEMA_VERSION: u64 = 1;

const VERSION_FIELD: &str = "version";
const KEY_ENCODING_FIELD: &str = "keyEncoding";
const HEADER_FIELD: &str = "header";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("brick map bytes are not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("serialized state is not a versioned envelope")]
    NotAnEnvelope,
    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(u64),
    #[error("unsupported key encoding: {0}")]
    UnsupportedKeyEncoding(String),
    #[error("envelope is missing field: {0}")]
    MissingField(&'static str),
    #[error("header root must be a directory")]
    RootNotDirectory,
}

pub(crate) fn encode<T: Serialize>(
    field: &'static str,
    body: &T,
    pretty: bool,
) -> Result<Vec<u8>, CodecError> {
    let mut envelope = Map::new();
    envelope.insert(VERSION_FIELD.to_string(), Value::from(SCHEMA_VERSION));
    envelope.insert(KEY_ENCODING_FIELD.to_string(), Value::from(KEY_ENCODING));
    envelope.insert(field.to_string(), serde_json::to_value(body)?);

    let envelope = Value::Object(envelope);
    let bytes = if pretty {
        serde_json::to_vec_pretty(&envelope)?
    } else {
        serde_json::to_vec(&envelope)?
    };
    Ok(bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(
    field: &'static str,
    raw: &[u8],
) -> Result<T, CodecError> {
    let text = std::str::from_utf8(raw)?;
    let mut envelope = match serde_json::from_str::<Value>(text)? {
        Value::Object(envelope) => envelope,
        _ => return Err(CodecError::NotAnEnvelope),
    };

    let version = envelope
        .get(VERSION_FIELD)
        .and_then(Value::as_u64)
        .ok_or(CodecError::MissingField(VERSION_FIELD))?;
    if version != SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let key_encoding = envelope
        .get(KEY_ENCODING_FIELD)
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField(KEY_ENCODING_FIELD))?;
    if key_encoding != KEY_ENCODING {
        return Err(CodecError::UnsupportedKeyEncoding(key_encoding.to_string()));
    }

    let body = envelope
        .remove(field)
        .ok_or(CodecError::MissingField(field))?;
    Ok(serde_json::from_value(body)?)
}

/// Encode a header tree as envelope bytes
pub fn encode_header(header: &Node, pretty: bool) -> Result<Vec<u8>, CodecError> {
    encode(HEADER_FIELD, header, pretty)
}

/// Decode envelope bytes into a header tree
pub fn decode_header(raw: &[u8]) -> Result<Node, CodecError> {
    let header: Node = decode(HEADER_FIELD, raw)?;
    if !header.is_directory() {
        return Err(CodecError::RootNotDirectory);
    }
    Ok(header)
}
