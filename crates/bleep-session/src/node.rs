use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::hash::Hash32;

/// A candidate service node, as seen in one registry snapshot.
///
/// Owned by the node registry; the session engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique identifier (hash of the node's public key)
    pub gid: Hash32,

    pub ip: String,

    pub relay_port: u16,

    /// Hashes of the chains this node has registered to service
    pub chains: BTreeSet<Hash32>,
}

impl Node {
    pub fn new(gid: Hash32, ip: &str, relay_port: u16, chains: impl IntoIterator<Item = Hash32>) -> Self {
        Node {
            gid,
            ip: ip.to_string(),
            relay_port,
            chains: chains.into_iter().collect(),
        }
    }

    pub fn supports(&self, chain: &Hash32) -> bool {
        self.chains.contains(chain)
    }
}
