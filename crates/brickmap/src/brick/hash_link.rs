use std::fmt;

use serde::{Deserialize, Serialize};

/// Content-hash identifier of a brick
///
/// Hash links produced by this crate are the lowercase hex encoding of the
/// BLAKE3 digest of a brick's raw bytes. Links read from a header are kept
/// verbatim, whatever hash function produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashLink(String);

impl HashLink {
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    /// Compute the hash link of some raw bytes
    pub fn digest(data: &[u8]) -> Self {
        Self(blake3::hash(data).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HashLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HashLink {
    fn from(link: &str) -> Self {
        Self(link.to_string())
    }
}

impl From<String> for HashLink {
    fn from(link: String) -> Self {
        Self(link)
    }
}

impl PartialEq<&str> for HashLink {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
