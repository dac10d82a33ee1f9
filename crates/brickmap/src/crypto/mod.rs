//! Key material for brick maps
//!
//! Two concerns live here:
//!
//! - **Key identities**: opaque, self-describing identifiers for the keys that
//!   address and encrypt bricks. A brick map carries a *template* identity used
//!   for its own serialized header; individual brick references may carry their
//!   own key bytes which override it.
//! - **Binary-safe key encoding**: raw key bytes have to survive a trip through
//!   the JSON header. [`KeyBytes`] writes them as standard base64 and still
//!   reads the legacy `{"type":"Buffer","data":[..]}` shape.

mod key_bytes;
mod key_identity;

pub use key_bytes::{KeyBytes, KEY_ENCODING};
pub use key_identity::{KeyError, KeyIdentity, KEY_IDENTITY_SIZE};
