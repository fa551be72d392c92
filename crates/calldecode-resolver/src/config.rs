//! Resolver configuration.

use calldecode_core::RegistryError;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

use crate::{
    fourbyte::{FourByteDirectory, DEFAULT_FOURBYTE_BASE},
    github::{GithubRegistry, DEFAULT_GITHUB_BASE},
    registry::SignatureRegistry,
    retry::RetryConfig,
};

/// Which public registry to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySource {
    /// ethereum-lists/4bytes raw files
    #[default]
    Github,
    /// 4byte.directory JSON API
    FourByte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub source: RegistrySource,
    /// Overrides the source's public endpoint.
    pub base_url: Option<String>,
    /// Lifetime of a found answer.
    pub positive_ttl_secs: u64,
    /// Lifetime of a not-found answer.
    pub negative_ttl_secs: u64,
    /// Bound on a single registry round-trip.
    pub request_timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source: RegistrySource::default(),
            base_url: None,
            positive_ttl_secs: 3600,
            negative_ttl_secs: 300,
            request_timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }
}

impl ResolverConfig {
    pub fn positive_ttl(&self) -> Duration {
        Duration::from_secs(self.positive_ttl_secs)
    }

    pub fn negative_ttl(&self) -> Duration {
        Duration::from_secs(self.negative_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.source) {
            (Some(url), _) => url,
            (None, RegistrySource::Github) => DEFAULT_GITHUB_BASE,
            (None, RegistrySource::FourByte) => DEFAULT_FOURBYTE_BASE,
        }
    }

    /// Construct the HTTP registry this config selects.
    pub fn build_registry(&self) -> Result<Arc<dyn SignatureRegistry>, RegistryError> {
        let registry: Arc<dyn SignatureRegistry> = match self.source {
            RegistrySource::Github => {
                Arc::new(GithubRegistry::new(self.base_url(), self.request_timeout())?)
            }
            RegistrySource::FourByte => {
                Arc::new(FourByteDirectory::new(self.base_url(), self.request_timeout())?)
            }
        };
        Ok(registry)
    }
}
