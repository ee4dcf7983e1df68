// Session assembly.
//
// SAFETY INVARIANTS:
// 1. Field-wise equal seeds always produce field-wise equal sessions
// 2. A session holds exactly `node_count` nodes with pairwise distinct GIDs
// 3. Construction is all-or-nothing; no partial session is ever returned
// 4. A session is immutable once built

use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::hash::Hash32;
use crate::key::KeyDeriver;
use crate::node::Node;
use crate::seed::{ExistenceOracle, SeedValidator, SessionSeed};
use crate::selector::NodeSelector;

/// The service nodes responsible for one request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    key: Hash32,
    dev_id: Hash32,
    block_hash: Hash32,
    chain: Vec<u8>,
    capacity: u64,
    nodes: Vec<Node>,
}

impl Session {
    /// Derive a session with the default configuration and no oracle.
    pub fn new(seed: &SessionSeed) -> Result<Self, SessionError> {
        SessionGenerator::default().generate(seed)
    }

    pub fn key(&self) -> &Hash32 {
        &self.key
    }

    pub fn dev_id(&self) -> &Hash32 {
        &self.dev_id
    }

    pub fn block_hash(&self) -> &Hash32 {
        &self.block_hash
    }

    /// The requested chain in canonical form: the decoded 32 bytes when the
    /// seed carried a hash (raw or hex), otherwise the raw bytes.
    pub fn chain(&self) -> &[u8] {
        &self.chain
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Selected nodes, closest to the key first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether `gid` is one of the nodes authorized to serve this session.
    pub fn contains_node(&self, gid: &Hash32) -> bool {
        self.nodes.iter().any(|node| &node.gid == gid)
    }
}

/// Builds sessions from seeds: validate, derive the key, select nodes.
#[derive(Clone, Default)]
pub struct SessionGenerator {
    config: SessionConfig,
    oracle: Option<Arc<dyn ExistenceOracle>>,
}

impl SessionGenerator {
    pub fn new(config: SessionConfig) -> Self {
        SessionGenerator { config, oracle: None }
    }

    /// Also check DevID and BlockHash against world state.
    pub fn with_oracle(mut self, oracle: Arc<dyn ExistenceOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn generate(&self, seed: &SessionSeed) -> Result<Session, SessionError> {
        let validator = match &self.oracle {
            Some(oracle) => SeedValidator::with_oracle(&**oracle),
            None => SeedValidator::new(),
        };
        let validated = validator.validate(seed)?;
        let key = KeyDeriver::derive(&validated);
        let nodes = NodeSelector::from_config(&self.config).select(
            &key,
            validated.node_list,
            validated.requested_chain,
        )?;

        info!("Session {} assembled with {} nodes", key, nodes.len());
        Ok(Session {
            key,
            dev_id: validated.dev_id,
            block_hash: validated.block_hash,
            chain: KeyDeriver::canonical_chain(validated.requested_chain),
            capacity: validated.capacity,
            nodes,
        })
    }

    /// Derive many independent sessions in parallel. Results keep input order.
    pub fn generate_batch(&self, seeds: &[SessionSeed]) -> Vec<Result<Session, SessionError>> {
        seeds.par_iter().map(|seed| self.generate(seed)).collect()
    }
}
