//! Backend document id derivation.

use std::fmt;

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// Length of a derived backend id in bytes.
pub const ID_LEN: usize = 12;

/// A deterministic 12-byte backend document id.
///
/// Derived from the UTF-8 string form of an arbitrary caller identifier via
/// SHAKE-256 truncated to 12 bytes. Identical inputs always derive identical
/// ids; the mapping is one-way. Displayed in the backend's native
/// 24-hex-character object-id form. No collision handling is performed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId([u8; ID_LEN]);

impl DocumentId {
    /// Derives the backend id for a caller identifier.
    pub fn derive(id: impl fmt::Display) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(id.to_string().as_bytes());
        let mut bytes = [0u8; ID_LEN];
        hasher.finalize_xof().read(&mut bytes);
        DocumentId(bytes)
    }

    /// Returns the raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self)
    }
}
