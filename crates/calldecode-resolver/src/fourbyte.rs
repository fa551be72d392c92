//! The 4byte.directory JSON API.

use async_trait::async_trait;
use calldecode_core::{RegistryError, Selector};
use serde::Deserialize;
use std::time::Duration;

use crate::{http, registry::SignatureRegistry};

pub const DEFAULT_FOURBYTE_BASE: &str = "https://www.4byte.directory";

#[derive(Debug, Deserialize)]
struct FourByteResponse {
    results: Vec<FourByteResult>,
}

#[derive(Debug, Deserialize)]
struct FourByteResult {
    text_signature: String,
}

pub struct FourByteDirectory {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl FourByteDirectory {
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

    pub fn public(timeout: Duration) -> Result<Self, RegistryError> {
        Self::new(DEFAULT_FOURBYTE_BASE, timeout)
    }

    fn url_for(&self, selector: Selector) -> String {
        format!(
            "{}/api/v1/signatures/?hex_signature={selector}",
            self.base_url
        )
    }
}

fn parse_results(body: &str) -> Result<Vec<String>, RegistryError> {
    let parsed: FourByteResponse = serde_json::from_str(body)
        .map_err(|e| RegistryError::InvalidResponse(format!("4byte.directory: {e}")))?;
    Ok(parsed
        .results
        .into_iter()
        .map(|r| r.text_signature.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[async_trait]
impl SignatureRegistry for FourByteDirectory {
    async fn lookup(&self, selector: Selector) -> Result<Vec<String>, RegistryError> {
        let url = self.url_for(selector);
        tracing::debug!(%selector, url = %url, "querying 4byte.directory");

        let Some(resp) = http::get(&self.client, &url, self.timeout).await? else {
            return Ok(Vec::new());
        };
        let body = resp
            .text()
            .await
            .map_err(|e| http::request_error(e, self.timeout))?;
        parse_results(&body)
    }

    fn name(&self) -> &str {
        "4byte.directory"
    }
}
