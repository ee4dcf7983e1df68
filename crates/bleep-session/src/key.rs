use log::debug;
use sha3::{Digest, Sha3_256};

use crate::hash::{Hash32, HASH_LEN};
use crate::seed::ValidatedSeed;

/// Derives the session key from the identity-bearing seed fields.
///
/// SAFETY: The key depends only on DevID, BlockHash and RequestedChain.
/// Node pool and capacity are excluded so that nodes holding different pool
/// views still agree on the key.
pub struct KeyDeriver;

impl KeyDeriver {
    /// Canonical chain bytes: the decoded 32 bytes when the requested chain
    /// is hash-formatted, otherwise the raw bytes.
    pub fn canonical_chain(requested_chain: &[u8]) -> Vec<u8> {
        match Hash32::parse(requested_chain) {
            Some(chain) => chain.to_vec(),
            None => requested_chain.to_vec(),
        }
    }

    /// `SHA3-256(dev_id || block_hash || u64_be(len(chain)) || chain)`
    pub fn derive(seed: &ValidatedSeed<'_>) -> Hash32 {
        let chain = Self::canonical_chain(seed.requested_chain);

        let mut hasher = Sha3_256::new();
        hasher.update(seed.dev_id.as_bytes());
        hasher.update(seed.block_hash.as_bytes());
        hasher.update((chain.len() as u64).to_be_bytes());
        hasher.update(&chain);

        let mut key = [0u8; HASH_LEN];
        key.copy_from_slice(&hasher.finalize());
        let key = Hash32::from_array(key);
        debug!("Derived session key {}", key);
        key
    }
}
