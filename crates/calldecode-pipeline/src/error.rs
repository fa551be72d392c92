//! Pipeline error taxonomy.

use calldecode_core::{CodecError, ResolveError, Selector, SyntaxError};
use thiserror::Error;

/// Every way a decode request can fail.
///
/// User-input and registry failures wrap the stage error they came from;
/// [`PipelineError::is_internal`] separates the invariant violations that
/// indicate a bug rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Fewer than 4 bytes: there is no selector to resolve.
    #[error("calldata is {len} byte(s) long, too short to hold a 4-byte selector")]
    TruncatedCalldata { len: usize },

    #[error("invalid calldata hex: {reason}")]
    InvalidHex { reason: String },

    #[error("invalid signature text: {0}")]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("calldata does not match signature: {0}")]
    Codec(#[from] CodecError),

    /// A registry candidate does not hash to the selector it was
    /// registered under.
    #[error("signature '{signature}' has selector {computed}, calldata has {expected}")]
    SelectorMismatch {
        expected: Selector,
        computed: Selector,
        signature: String,
    },

    /// A caller-supplied signature does not hash to the calldata's selector.
    #[error("signature '{signature}' has selector {computed}, calldata has {expected}")]
    SignatureMismatch {
        expected: Selector,
        computed: Selector,
        signature: String,
    },

    #[error("decoded {got} argument(s) for a signature with {expected} parameter(s)")]
    LengthMismatch { expected: usize, got: usize },

    #[error("argument {index} decoded as {got}, signature declares {expected}")]
    ValueTypeMismatch {
        index: usize,
        expected: String,
        got: String,
    },
}

impl PipelineError {
    /// Stable short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TruncatedCalldata { .. } => "type_decode",
            Self::InvalidHex { .. } => "invalid_hex",
            Self::Syntax(_) => "syntax",
            Self::Resolve(ResolveError::NotFound { .. }) => "not_found",
            Self::Resolve(ResolveError::Network { .. }) => "network",
            Self::Codec(CodecError::TypeDecode { .. }) => "type_decode",
            Self::Codec(CodecError::OffsetOutOfBounds { .. }) => "offset_out_of_bounds",
            Self::Codec(CodecError::Encode { .. }) => "encode",
            Self::SelectorMismatch { .. } => "selector_mismatch",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::ValueTypeMismatch { .. } => "value_type_mismatch",
        }
    }

    /// `true` for invariant violations between the resolver, the grammar
    /// and the codec. These are logged at `error` and are never the
    /// caller's fault.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::SelectorMismatch { .. } | Self::LengthMismatch { .. } | Self::ValueTypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calldecode_core::RegistryError;

    #[test]
    fn kinds() {
        let selector = Selector::new([0; 4]);
        assert_eq!(PipelineError::TruncatedCalldata { len: 3 }.kind(), "type_decode");
        assert_eq!(
            PipelineError::from(ResolveError::NotFound { selector }).kind(),
            "not_found"
        );
        assert_eq!(
            PipelineError::from(ResolveError::Network {
                selector,
                attempts: 3,
                source: RegistryError::Timeout { ms: 100 },
            })
            .kind(),
            "network"
        );
        assert_eq!(
            PipelineError::from(CodecError::OffsetOutOfBounds { position: 0, available: 0 }).kind(),
            "offset_out_of_bounds"
        );
    }

    #[test]
    fn only_invariant_violations_are_internal() {
        assert!(PipelineError::LengthMismatch { expected: 2, got: 1 }.is_internal());
        assert!(PipelineError::SelectorMismatch {
            expected: Selector::new([1; 4]),
            computed: Selector::new([2; 4]),
            signature: "f()".into(),
        }
        .is_internal());
        assert!(!PipelineError::SignatureMismatch {
            expected: Selector::new([1; 4]),
            computed: Selector::new([2; 4]),
            signature: "f()".into(),
        }
        .is_internal());
        assert!(!PipelineError::TruncatedCalldata { len: 0 }.is_internal());
        assert!(!PipelineError::from(CodecError::type_decode(0, "bad bool")).is_internal());
    }

    #[test]
    fn not_found_message_names_selector() {
        let err = PipelineError::from(ResolveError::NotFound {
            selector: Selector::new([0; 4]),
        });
        assert_eq!(err.to_string(), "no signature registered for selector 0x00000000");
    }
}
