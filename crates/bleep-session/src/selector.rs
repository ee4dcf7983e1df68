// Service-node selection.
//
// SAFETY INVARIANTS:
// 1. Selection is a pure function of (session key, node snapshot, chain)
// 2. The pool is keyed by GID before sorting; the first occurrence wins
// 3. Order is ascending XOR distance to the key, ties broken by GID bytes
// 4. Exactly `node_count` distinct nodes are returned, or nothing

use log::{debug, warn};
use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::hash::Hash32;
use crate::node::Node;

/// Picks the nodes closest to a session key among those serving a chain.
pub struct NodeSelector {
    node_count: usize,
}

impl NodeSelector {
    pub fn new(node_count: NonZeroUsize) -> Self {
        NodeSelector {
            node_count: node_count.get(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.node_count())
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Deduplicate by GID, then keep nodes registered for `requested_chain`.
    ///
    /// A requested chain that is not hash-formatted matches no node.
    pub fn eligible<'a>(&self, node_list: &'a [Node], requested_chain: &[u8]) -> Vec<&'a Node> {
        let mut seen = HashSet::with_capacity(node_list.len());
        let mut unique = Vec::with_capacity(node_list.len());
        for node in node_list {
            if seen.insert(node.gid) {
                unique.push(node);
            } else {
                warn!("Dropping duplicate node {} from candidate pool", node.gid);
            }
        }

        let chain = match Hash32::parse(requested_chain) {
            Some(chain) => chain,
            None => return Vec::new(),
        };
        unique.into_iter().filter(|node| node.supports(&chain)).collect()
    }

    /// Select the `node_count` nodes closest to `session_key`.
    pub fn select(
        &self,
        session_key: &Hash32,
        node_list: &[Node],
        requested_chain: &[u8],
    ) -> Result<Vec<Node>, SessionError> {
        let eligible = self.eligible(node_list, requested_chain);
        if eligible.len() < self.node_count {
            warn!(
                "Only {} eligible nodes for chain, {} required",
                eligible.len(),
                self.node_count
            );
            return Err(SessionError::InsufficientNodes {
                eligible: eligible.len(),
                required: self.node_count,
            });
        }

        let mut ranked: Vec<(Hash32, &Node)> = eligible
            .into_iter()
            .map(|node| (session_key.xor_distance(&node.gid), node))
            .collect();
        ranked.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.gid.cmp(&b.gid)));

        let selected: Vec<Node> = ranked
            .into_iter()
            .take(self.node_count)
            .map(|(_, node)| node.clone())
            .collect();
        debug!("Selected {} nodes closest to {}", selected.len(), session_key);
        Ok(selected)
    }
}
