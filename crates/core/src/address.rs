//! Account addresses.

use crate::hash::hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte account address.
pub type AddressBytes = [u8; 20];

/// An address on the ledger.
///
/// The all-zero address is reserved and treated as "no address" by message
/// validation. Human-readable formats (JSON) carry the `0x` hex form; binary
/// formats carry the raw 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub AddressBytes);

/// Errors returned when parsing an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl Address {
    /// The zero address (all zeros).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: AddressBytes) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic address from a human-readable seed.
    ///
    /// The address is the first 20 bytes of the Blake3 hash of the seed, which
    /// gives genesis files and the CLI stable names like `alice`.
    pub fn from_seed(seed: &str) -> Self {
        let digest = hash(seed.as_bytes());
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&digest.0[..20]);
        Self(addr)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &AddressBytes {
        &self.0
    }

    /// Whether this is the reserved empty address.
    pub fn is_empty(&self) -> bool {
        *self == Self::ZERO
    }

    /// Convert to a hex string (with 0x prefix).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            AddressBytes::deserialize(deserializer).map(Self)
        }
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
