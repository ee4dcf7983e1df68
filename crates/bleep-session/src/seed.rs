// Session seed validation.
//
// SAFETY INVARIANTS:
// 1. Checks run in a fixed order; the first violated check is the one reported
// 2. Presence checks for all five fields run before any format check
// 3. Format checks only fire for fields that are present
// 4. World-state existence is only consulted when an oracle is wired in

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{RegistryError, SessionError};
use crate::hash::Hash32;
use crate::node::Node;
use crate::registry::NodeRegistry;

/// Unvalidated request context a session is derived from.
///
/// An empty field is an absent field. Built per request and consumed by a
/// single derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    /// Requesting developer id, 32 raw bytes or 64 hex characters
    pub dev_id: Vec<u8>,

    /// Finalized block hash, 32 raw bytes or 64 hex characters
    pub block_hash: Vec<u8>,

    /// Hash of the requested chain descriptor
    pub requested_chain: Vec<u8>,

    /// Candidate node snapshot
    pub node_list: Vec<Node>,

    /// Requested throughput allowance
    pub capacity: u64,
}

impl SessionSeed {
    /// Build a seed from the current snapshot of a node registry.
    pub fn from_registry(
        dev_id: &[u8],
        registry: &dyn NodeRegistry,
        requested_chain: &[u8],
        block_hash: &[u8],
        capacity: u64,
    ) -> Result<Self, RegistryError> {
        Ok(SessionSeed {
            dev_id: dev_id.to_vec(),
            block_hash: block_hash.to_vec(),
            requested_chain: requested_chain.to_vec(),
            node_list: registry.snapshot()?,
            capacity,
        })
    }
}

/// A seed whose fields have passed every validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSeed<'a> {
    pub dev_id: Hash32,
    pub block_hash: Hash32,
    pub requested_chain: &'a [u8],
    pub node_list: &'a [Node],
    pub capacity: u64,
}

/// World-state lookups the validator may consult.
pub trait ExistenceOracle: Send + Sync {
    fn dev_id_exists(&self, dev_id: &Hash32) -> bool;

    fn block_hash_exists(&self, block_hash: &Hash32) -> bool;
}

/// Stateless seed validator.
#[derive(Default)]
pub struct SeedValidator<'o> {
    oracle: Option<&'o dyn ExistenceOracle>,
}

impl<'o> SeedValidator<'o> {
    pub fn new() -> Self {
        SeedValidator { oracle: None }
    }

    pub fn with_oracle(oracle: &'o dyn ExistenceOracle) -> Self {
        SeedValidator {
            oracle: Some(oracle),
        }
    }

    /// Validate a seed field by field.
    ///
    /// Order: DevID, BlockHash, RequestedChain, NodeList, Capacity presence;
    /// then DevID and BlockHash format; then, with an oracle, DevID and
    /// BlockHash existence.
    pub fn validate<'s>(&self, seed: &'s SessionSeed) -> Result<ValidatedSeed<'s>, SessionError> {
        if seed.dev_id.is_empty() {
            return Err(SessionError::NoDevID);
        }
        if seed.block_hash.is_empty() {
            return Err(SessionError::NoBlockHash);
        }
        if seed.requested_chain.is_empty() {
            return Err(SessionError::NoReqChain);
        }
        if seed.node_list.is_empty() {
            return Err(SessionError::NoNodeList);
        }
        if seed.capacity == 0 {
            return Err(SessionError::NoCapacity);
        }

        let dev_id = Hash32::parse(&seed.dev_id).ok_or(SessionError::InvalidDevIDFormat)?;
        let block_hash = Hash32::parse(&seed.block_hash).ok_or(SessionError::InvalidBlockHashFormat)?;

        if let Some(oracle) = self.oracle {
            if !oracle.dev_id_exists(&dev_id) {
                return Err(SessionError::DevIDNotFound);
            }
            if !oracle.block_hash_exists(&block_hash) {
                return Err(SessionError::BlockHashNotFound);
            }
        }

        debug!("Validated seed for dev {} at block {}", dev_id, block_hash);
        Ok(ValidatedSeed {
            dev_id,
            block_hash,
            requested_chain: &seed.requested_chain,
            node_list: &seed.node_list,
            capacity: seed.capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn full_seed() -> SessionSeed {
        SessionSeed {
            dev_id: Hash32::sha3_from_str("foo").to_hex_bytes(),
            block_hash: Hash32::sha3_from_str("foo").to_hex_bytes(),
            requested_chain: Hash32::sha3_from_str("eth").to_hex_bytes(),
            node_list: vec![Node::new(Hash32::sha3_from_str("n"), "10.0.0.1", 8081, Vec::new())],
            capacity: 100,
        }
    }

    struct KnownWorld {
        dev_ids: HashSet<Hash32>,
        blocks: HashSet<Hash32>,
    }

    impl ExistenceOracle for KnownWorld {
        fn dev_id_exists(&self, dev_id: &Hash32) -> bool {
            self.dev_ids.contains(dev_id)
        }

        fn block_hash_exists(&self, block_hash: &Hash32) -> bool {
            self.blocks.contains(block_hash)
        }
    }

    #[test]
    fn test_full_seed_validates() {
        let seed = full_seed();
        let validated = SeedValidator::new().validate(&seed).unwrap();
        assert_eq!(validated.dev_id, Hash32::sha3_from_str("foo"));
        assert_eq!(validated.capacity, 100);
    }

    #[test]
    fn test_presence_checked_in_order() {
        let empty = SessionSeed::default();
        assert_eq!(SeedValidator::new().validate(&empty), Err(SessionError::NoDevID));

        let seed = SessionSeed {
            dev_id: b"invalidtest".to_vec(),
            ..Default::default()
        };
        // a malformed DevID does not mask a later missing field
        assert_eq!(SeedValidator::new().validate(&seed), Err(SessionError::NoBlockHash));

        let mut seed = full_seed();
        seed.requested_chain.clear();
        seed.capacity = 0;
        assert_eq!(SeedValidator::new().validate(&seed), Err(SessionError::NoReqChain));
    }

    #[test]
    fn test_format_checked_after_presence() {
        let mut seed = full_seed();
        seed.dev_id = b"invalidtest".to_vec();
        seed.block_hash = b"foo".to_vec();
        assert_eq!(SeedValidator::new().validate(&seed), Err(SessionError::InvalidDevIDFormat));

        let mut seed = full_seed();
        seed.block_hash = b"foo".to_vec();
        assert_eq!(SeedValidator::new().validate(&seed), Err(SessionError::InvalidBlockHashFormat));
    }

    #[test]
    fn test_oracle_consulted_after_format() {
        let world = KnownWorld {
            dev_ids: HashSet::from([Hash32::sha3_from_str("foo")]),
            blocks: HashSet::new(),
        };
        let validator = SeedValidator::with_oracle(&world);

        assert_eq!(validator.validate(&full_seed()), Err(SessionError::BlockHashNotFound));

        let mut seed = full_seed();
        seed.dev_id = Hash32::sha3_from_str("bar").to_hex_bytes();
        assert_eq!(validator.validate(&seed), Err(SessionError::DevIDNotFound));

        let mut seed = full_seed();
        seed.dev_id = b"invalidtest".to_vec();
        assert_eq!(validator.validate(&seed), Err(SessionError::InvalidDevIDFormat));
    }
}
