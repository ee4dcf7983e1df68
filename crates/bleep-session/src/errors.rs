use thiserror::Error;

/// Errors produced while turning a seed into a session.
///
/// Validation kinds are reported in a fixed precedence order (see
/// `SeedValidator::validate`); `InsufficientNodes` is the only selection-time
/// failure. No partial session is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session seed is missing the developer id")]
    NoDevID,

    #[error("Session seed is missing the block hash")]
    NoBlockHash,

    #[error("Session seed is missing the requested chain")]
    NoReqChain,

    #[error("Session seed is missing the node list")]
    NoNodeList,

    #[error("Session seed is missing the capacity")]
    NoCapacity,

    #[error("Developer id is not a valid 32-byte hash")]
    InvalidDevIDFormat,

    #[error("Block hash is not a valid 32-byte hash")]
    InvalidBlockHashFormat,

    /// Only reported when an `ExistenceOracle` is wired in.
    #[error("Developer id not found in world state")]
    DevIDNotFound,

    /// Only reported when an `ExistenceOracle` is wired in.
    #[error("Block hash not found in world state")]
    BlockHashNotFound,

    #[error("Insufficient nodes for requested chain: {eligible} eligible, {required} required")]
    InsufficientNodes { eligible: usize, required: usize },
}

/// Failures of a node registry while producing a snapshot.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read node pool {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse node pool: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid node GID {0:?}")]
    InvalidGid(String),

    #[error("Chain descriptor encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load session config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid session config: {0}")]
    Invalid(String),
}
