//! Relay session derivation for BLEEP service nodes.
//!
//! Every full node maps a request context (developer id, finalized block hash,
//! requested chain) plus a node snapshot to the same session key and the same
//! bounded set of service nodes, without coordinating with any other node.

pub mod chain;
pub mod config;
pub mod errors;
pub mod hash;
pub mod key;
pub mod node;
pub mod registry;
pub mod seed;
pub mod selector;
pub mod session;

pub use crate::chain::ChainDescriptor;
pub use crate::config::{SessionConfig, NODECOUNT};
pub use crate::errors::{ConfigError, RegistryError, SessionError};
pub use crate::hash::{Hash32, HASH_LEN};
pub use crate::key::KeyDeriver;
pub use crate::node::Node;
pub use crate::registry::{JsonFileRegistry, NodeRegistry, StaticRegistry};
pub use crate::seed::{ExistenceOracle, SeedValidator, SessionSeed, ValidatedSeed};
pub use crate::selector::NodeSelector;
pub use crate::session::{Session, SessionGenerator};
