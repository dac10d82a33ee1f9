use std::fmt;

/// Size of a freshly generated key identity in bytes
pub const KEY_IDENTITY_SIZE: usize = 32;

/// Errors that can occur during key identity operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Opaque identifier for an encryption/addressing key
///
/// The identity wraps the raw key bytes. Its stable string form
/// ([`KeyIdentity::identifier`]) is the lowercase hex encoding of those bytes,
/// so two identities built from the same bytes always compare and print equal.
///
/// # Examples
///
/// ```ignore
/// let key = KeyIdentity::generate()?;
/// let id = key.identifier();
/// let recovered = KeyIdentity::from_identifier(&id)?;
/// assert_eq!(key, recovered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyIdentity(Vec<u8>);

impl KeyIdentity {
    /// Generate a new random identity using the system RNG
    pub fn generate() -> Result<Self, KeyError> {
        let mut buff = [0; KEY_IDENTITY_SIZE];
        getrandom::getrandom(&mut buff)
            .map_err(|e| anyhow::anyhow!("failed to generate random bytes: {}", e))?;
        Ok(Self(buff.to_vec()))
    }

    /// Wrap existing key bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse an identity from its hex identifier
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_identifier(identifier: &str) -> Result<Self, KeyError> {
        let identifier = identifier.strip_prefix("0x").unwrap_or(identifier);
        let bytes = hex::decode(identifier)
            .map_err(|_| anyhow::anyhow!("key identity hex decode error"))?;
        Ok(Self(bytes))
    }

    /// The stable string form of this identity
    pub fn identifier(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

impl From<&[u8]> for KeyIdentity {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}
