// Fixed-length identifiers shared by every party that derives sessions.
//
// SAFETY INVARIANTS:
// 1. DevID, BlockHash, GID and SessionKey are all exactly 32 bytes
// 2. Every party uses SHA3-256 as the digest, or cross-node agreement breaks
// 3. XOR distance is a total order over 32-byte values (big-endian unsigned)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Byte length of every hash-format identifier.
pub const HASH_LEN: usize = 32;

/// A 32-byte SHA3-256 sized identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash32([u8; HASH_LEN]);

impl Hash32 {
    pub const fn from_array(bytes: [u8; HASH_LEN]) -> Self {
        Hash32(bytes)
    }

    /// SHA3-256 of arbitrary bytes.
    pub fn sha3_from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Hash32(bytes)
    }

    pub fn sha3_from_str(s: &str) -> Self {
        Self::sha3_from_bytes(s.as_bytes())
    }

    /// Parse a raw seed field.
    ///
    /// Accepts exactly 32 raw bytes, or exactly 64 ASCII hex characters.
    /// Anything else is not a well-formed hash.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        match raw.len() {
            HASH_LEN => {
                let mut bytes = [0u8; HASH_LEN];
                bytes.copy_from_slice(raw);
                Some(Hash32(bytes))
            }
            n if n == HASH_LEN * 2 => {
                let mut bytes = [0u8; HASH_LEN];
                hex::decode_to_slice(raw, &mut bytes).ok()?;
                Some(Hash32(bytes))
            }
            _ => None,
        }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != HASH_LEN * 2 {
            return None;
        }
        Self::parse(s.as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Hex text as bytes, the form seeds usually carry on the wire.
    pub fn to_hex_bytes(&self) -> Vec<u8> {
        self.to_hex().into_bytes()
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Bitwise XOR of the two identifiers.
    ///
    /// Comparing the result with `Ord` compares it as an unsigned
    /// big-endian integer, so smaller means closer.
    pub fn xor_distance(&self, other: &Hash32) -> Hash32 {
        let mut out = [0u8; HASH_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self.0[i] ^ other.0[i];
        }
        Hash32(out)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash32::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid 32-byte hex hash: {}", s)))
    }
}
