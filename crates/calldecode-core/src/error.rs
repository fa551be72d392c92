//! Error types for the CallDecode pipeline stages.

use thiserror::Error;

use crate::selector::Selector;

/// Malformed signature text.
///
/// `position` is the byte offset into the original text where parsing
/// failed and `fragment` the offending substring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at byte {position} near '{fragment}': {reason}")]
pub struct SyntaxError {
    pub position: usize,
    pub fragment: String,
    pub reason: String,
}

/// Errors raised while decoding or encoding ABI data.
///
/// Byte positions are relative to the start of the argument body, i.e.
/// calldata with its 4-byte selector already removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("type decode failed at byte {position}: {reason}")]
    TypeDecode { position: usize, reason: String },

    /// An offset or length word, or a region it addresses, does not fit in
    /// the buffer. `position` is the byte where the bad word (or the
    /// missing region) starts.
    #[error("read at byte {position} reaches past the end of the {available}-byte buffer")]
    OffsetOutOfBounds { position: usize, available: usize },

    #[error("encode failed: {reason}")]
    Encode { reason: String },
}

impl CodecError {
    pub fn type_decode(position: usize, reason: impl Into<String>) -> Self {
        Self::TypeDecode {
            position,
            reason: reason.into(),
        }
    }
}

/// A single failed round-trip against a signature registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Connection refused, reset, DNS failure, etc.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The registry answered with an unexpected status code.
    #[error("registry returned HTTP {status}")]
    Status { status: u16 },

    #[error("registry request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The body could not be interpreted.
    #[error("invalid registry response: {0}")]
    InvalidResponse(String),
}

impl RegistryError {
    /// Returns `true` if the failure is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout { .. } => true,
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Errors from the selector resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no signature registered for selector {selector}")]
    NotFound { selector: Selector },

    #[error("signature lookup for {selector} failed after {attempts} attempt(s): {source}")]
    Network {
        selector: Selector,
        attempts: u32,
        #[source]
        source: RegistryError,
    },
}
