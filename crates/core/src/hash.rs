//! Blake3 digests used for addresses and state commitments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash (all zeros).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash(0x{})", &self.to_hex()[..8])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Hash arbitrary data using Blake3.
pub fn hash(data: &[u8]) -> Hash {
    Hash(blake3::hash(data).into())
}

/// Incremental commitment over an ordered sequence of key/value entries.
///
/// Each entry is length-prefixed so that `("ab", "c")` and `("a", "bc")`
/// commit to different digests. Callers must feed entries in a canonical
/// order (the storage layer uses ascending key order).
pub struct EntryHasher {
    inner: blake3::Hasher,
    entries: u64,
}

impl EntryHasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
            entries: 0,
        }
    }

    /// Absorb one key/value entry.
    pub fn update(&mut self, key: &[u8], value: &[u8]) {
        self.inner.update(&(key.len() as u64).to_le_bytes());
        self.inner.update(key);
        self.inner.update(&(value.len() as u64).to_le_bytes());
        self.inner.update(value);
        self.entries += 1;
    }

    /// Number of entries absorbed so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn finalize(self) -> Hash {
        if self.entries == 0 {
            return Hash::ZERO;
        }
        Hash(self.inner.finalize().into())
    }
}

impl Default for EntryHasher {
    fn default() -> Self {
        Self::new()
    }
}
