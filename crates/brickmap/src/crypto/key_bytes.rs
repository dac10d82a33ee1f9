use std::ops::Deref;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the text encoding used for key bytes in serialized headers
pub const KEY_ENCODING: &str = "base64";

/// Tag carried by the legacy binary-buffer shape
const BUFFER_TAG: &str = "Buffer";

/// Raw encryption key bytes attached to a brick reference
///
/// Serializes as a standard base64 string. Deserializes from either a base64
/// string or the legacy binary-buffer object `{"type": "Buffer", "data": [..]}`,
/// which is only recognized with exactly those two fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyBytes(Vec<u8>);

impl KeyBytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for KeyBytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for KeyBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for KeyBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for KeyBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Encoded(String),
    Buffer(BufferRepr),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BufferRepr {
    #[serde(rename = "type")]
    tag: String,
    data: Vec<u8>,
}

impl<'de> Deserialize<'de> for KeyBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match KeyRepr::deserialize(deserializer)? {
            KeyRepr::Encoded(text) => STANDARD
                .decode(text.as_bytes())
                .map(KeyBytes)
                .map_err(serde::de::Error::custom),
            KeyRepr::Buffer(buffer) if buffer.tag == BUFFER_TAG => Ok(KeyBytes(buffer.data)),
            KeyRepr::Buffer(buffer) => Err(serde::de::Error::custom(format!(
                "unrecognized binary buffer tag: {}",
                buffer.tag
            ))),
        }
    }
}
