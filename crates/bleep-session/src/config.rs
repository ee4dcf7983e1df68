use ::config::{Config, Environment, File, FileFormat};
use log::info;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::errors::ConfigError;

/// Number of service nodes in every session.
pub const NODECOUNT: usize = 5;

const DEFAULT_NODE_COUNT: NonZeroUsize = match NonZeroUsize::new(NODECOUNT) {
    Some(n) => n,
    None => panic!("NODECOUNT must be > 0"),
};

/// Prefix for environment overrides, e.g. `BLEEP_SESSION_NODE_COUNT=7`.
pub const ENV_PREFIX: &str = "BLEEP_SESSION";

/// Session engine parameters.
///
/// SAFETY: Every node in the network must run with the same `node_count`,
/// otherwise nodes disagree on session membership. A zero count cannot be
/// represented, whether built in code or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    node_count: NonZeroUsize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            node_count: DEFAULT_NODE_COUNT,
        }
    }
}

impl SessionConfig {
    pub fn new(node_count: usize) -> Result<Self, ConfigError> {
        let node_count = NonZeroUsize::new(node_count)
            .ok_or_else(|| ConfigError::Invalid("node_count must be > 0".to_string()))?;
        Ok(SessionConfig { node_count })
    }

    pub fn node_count(&self) -> NonZeroUsize {
        self.node_count
    }

    /// Load from an optional TOML file, then `BLEEP_SESSION_*` variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().set_default("node_count", NODECOUNT as i64)?;
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let config: SessionConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        info!("Session config loaded: node_count={}", config.node_count);
        Ok(config)
    }

    /// Parse TOML text, without consulting the environment.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = Config::builder()
            .set_default("node_count", NODECOUNT as i64)?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
