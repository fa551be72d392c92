//! Top-level decoder configuration, loaded from YAML.
//!
//! ```yaml
//! resolver:
//!   source: github
//!   positive_ttl_secs: 3600
//!   negative_ttl_secs: 300
//!   retry:
//!     max_retries: 3
//! log:
//!   level: info
//!   components:
//!     resolver: debug
//! ```

use calldecode_observability::LogConfig;
use calldecode_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub resolver: ResolverConfig,
    pub log: LogConfig,
}

impl DecoderConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}
