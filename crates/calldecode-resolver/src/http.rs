//! Shared `reqwest` plumbing for the HTTP registries.

use calldecode_core::RegistryError;
use std::time::Duration;

const USER_AGENT: &str = concat!("calldecode/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, RegistryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| RegistryError::Http(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn request_error(e: reqwest::Error, timeout: Duration) -> RegistryError {
    if e.is_timeout() {
        RegistryError::Timeout {
            ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        RegistryError::Http(e.to_string())
    }
}

/// `GET url`, mapping 404 to `Ok(None)` and other non-2xx codes to
/// `RegistryError::Status`.
pub(crate) async fn get(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Option<reqwest::Response>, RegistryError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| request_error(e, timeout))?;

    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(RegistryError::Status {
            status: status.as_u16(),
        });
    }
    Ok(Some(resp))
}

/// Strip trailing slashes so paths can be appended with `/`.
pub(crate) fn normalize_base(url: impl Into<String>) -> String {
    let mut url = url.into();
    while url.ends_with('/') {
        url.pop();
    }
    url
}
