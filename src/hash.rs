use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

use crate::Error;

/// number of bytes in a digest
pub const HASH_LEN: usize = 20;

/// SHA-1 digest used for content addressing of blobs and commits
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// zero hash (useful as sentinel)
    pub const ZERO: Hash = Hash([0u8; HASH_LEN]);

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// parse from a full 40-char hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        if bytes.len() != HASH_LEN {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// abbreviated hex form used in merge log lines
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 38 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// compute blob hash over the raw content bytes
pub fn compute_blob_hash(content: &[u8]) -> Hash {
    Hash(Sha1::digest(content).into())
}

/// hasher over a sequence of string fields
///
/// each field is length-prefixed (4 bytes LE) so adjacent fields
/// cannot run into each other.
pub struct FieldHasher {
    hasher: Sha1,
}

impl FieldHasher {
    pub fn new() -> Self {
        Self {
            hasher: Sha1::new(),
        }
    }

    /// feed one field
    pub fn field(mut self, value: &str) -> Self {
        self.hasher.update((value.len() as u32).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    /// finalize and return hash
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for FieldHasher {
    fn default() -> Self {
        Self::new()
    }
}
