// Node registry collaborators.
//
// A registry hands the session engine an owned snapshot of candidate nodes.
// The engine never reads a live registry, so concurrent registry updates
// cannot tear a derivation in progress.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::chain::ChainDescriptor;
use crate::errors::RegistryError;
use crate::hash::Hash32;
use crate::node::Node;

/// Source of candidate node snapshots.
pub trait NodeRegistry: Send + Sync {
    /// Return an immutable copy of the current node pool.
    fn snapshot(&self) -> Result<Vec<Node>, RegistryError>;
}

/// Registry backed by an in-memory node list.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    nodes: Vec<Node>,
}

impl StaticRegistry {
    pub fn new(nodes: Vec<Node>) -> Self {
        StaticRegistry { nodes }
    }
}

impl NodeRegistry for StaticRegistry {
    fn snapshot(&self) -> Result<Vec<Node>, RegistryError> {
        Ok(self.nodes.clone())
    }
}

/// On-disk node record. Chains are registered by descriptor and hashed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub gid: String,
    pub ip: String,
    pub relay_port: u16,
    pub chains: Vec<ChainDescriptor>,
}

impl NodeRecord {
    pub fn into_node(self) -> Result<Node, RegistryError> {
        let gid = Hash32::from_hex(&self.gid).ok_or_else(|| RegistryError::InvalidGid(self.gid.clone()))?;
        let chains = self
            .chains
            .iter()
            .map(ChainDescriptor::hash)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::new(gid, &self.ip, self.relay_port, chains))
    }
}

/// Parse a JSON array of node records.
pub fn nodes_from_json(json: &str) -> Result<Vec<Node>, RegistryError> {
    let records: Vec<NodeRecord> = serde_json::from_str(json)?;
    records.into_iter().map(NodeRecord::into_node).collect()
}

/// Registry that reads a JSON node pool file on every snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileRegistry {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NodeRegistry for JsonFileRegistry {
    fn snapshot(&self) -> Result<Vec<Node>, RegistryError> {
        debug!("Loading node pool from {}", self.path.display());
        let contents = fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let nodes = nodes_from_json(&contents)?;
        info!("Loaded {} nodes from {}", nodes.len(), self.path.display());
        Ok(nodes)
    }
}
