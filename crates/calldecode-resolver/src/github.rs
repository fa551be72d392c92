//! The ethereum-lists `4bytes` repository, read as raw files.
//!
//! Each selector has a file at `signatures/<8 hex chars>` holding one
//! signature, or several separated by `;` when selectors collide.

use async_trait::async_trait;
use calldecode_core::{RegistryError, Selector};
use std::time::Duration;

use crate::{
    http,
    registry::{split_signature_list, SignatureRegistry},
};

pub const DEFAULT_GITHUB_BASE: &str =
    "https://raw.githubusercontent.com/ethereum-lists/4bytes/master";

pub struct GithubRegistry {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GithubRegistry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        Ok(Self::with_client(http::build_client(timeout)?, base_url, timeout))
    }

    /// Use a caller-built client (shared pool, proxy settings, ...).
    /// `timeout` is only used to label timeout errors.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: http::normalize_base(base_url),
            timeout,
        }
    }

    /// The public repository on `raw.githubusercontent.com`.
    pub fn public(timeout: Duration) -> Result<Self, RegistryError> {
        Self::new(DEFAULT_GITHUB_BASE, timeout)
    }

    fn url_for(&self, selector: Selector) -> String {
        format!("{}/signatures/{}", self.base_url, selector.hex_key())
    }
}

#[async_trait]
impl SignatureRegistry for GithubRegistry {
    async fn lookup(&self, selector: Selector) -> Result<Vec<String>, RegistryError> {
        let url = self.url_for(selector);
        tracing::debug!(%selector, url = %url, "querying 4bytes repository");

        let Some(resp) = http::get(&self.client, &url, self.timeout).await? else {
            return Ok(Vec::new());
        };
        let body = resp
            .text()
            .await
            .map_err(|e| http::request_error(e, self.timeout))?;
        Ok(split_signature_list(&body))
    }

    fn name(&self) -> &str {
        "github-4bytes"
    }
}
