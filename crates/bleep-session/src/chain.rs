use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;
use crate::hash::Hash32;

/// Human-meaningful description of a relayed blockchain.
///
/// Seeds never carry the descriptor itself, only its hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub name: String,
    pub net_id: String,
    pub version: String,
}

impl ChainDescriptor {
    pub fn new(name: &str, net_id: &str, version: &str) -> Self {
        ChainDescriptor {
            name: name.to_string(),
            net_id: net_id.to_string(),
            version: version.to_string(),
        }
    }

    /// Canonical byte encoding: bincode, fields in declaration order,
    /// strings prefixed with their u64 little-endian length.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, RegistryError> {
        bincode::serialize(self).map_err(|e| RegistryError::Encoding(e.to_string()))
    }

    /// SHA3-256 over the canonical encoding. This is the `RequestedChain`
    /// value seeds and node registrations refer to.
    pub fn hash(&self) -> Result<Hash32, RegistryError> {
        Ok(Hash32::sha3_from_bytes(&self.canonical_bytes()?))
    }
}
