//! `DecodePipeline`: calldata → selector → signature → arguments.
//!
//! Each step is a failure point reported as a [`PipelineError`]; a call
//! either decodes completely or not at all. The only suspension point is
//! the resolver's registry lookup, so dropping a `decode_call` future
//! cancels the request cleanly.

use calldecode_core::{signature, DecodedCall, RegistryError, ResolveError, Selector, Signature};
use calldecode_resolver::{ResolverConfig, SelectorResolver};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{calldata::parse_calldata_hex, error::PipelineError};

/// Decodes calldata using signatures from a shared [`SelectorResolver`].
///
/// Cheap to clone; clones share the resolver and its cache.
#[derive(Clone)]
pub struct DecodePipeline {
    resolver: Arc<SelectorResolver>,
}

impl DecodePipeline {
    pub fn new(resolver: Arc<SelectorResolver>) -> Self {
        Self { resolver }
    }

    /// Pipeline over the HTTP registry `config` selects.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(Arc::new(SelectorResolver::from_config(config)?)))
    }

    pub fn resolver(&self) -> &Arc<SelectorResolver> {
        &self.resolver
    }

    /// Decode full calldata (selector + arguments).
    ///
    /// When the registry holds several signatures for the selector, the
    /// first one (in registry order) whose canonical form hashes to the
    /// selector is used; all of them are kept in
    /// [`DecodedCall::candidates`].
    pub async fn decode_call(&self, calldata: &[u8]) -> Result<DecodedCall, PipelineError> {
        let (selector, body) = split(calldata)?;

        let candidates = self.resolver.resolve(selector).await.map_err(|e| {
            debug!(%selector, error = %e, "selector resolution failed");
            PipelineError::from(e)
        })?;

        let signature = choose_candidate(selector, &candidates)?;
        if candidates.len() > 1 {
            info!(
                %selector,
                chosen = %signature,
                candidates = candidates.len(),
                "ambiguous selector, decoding with first matching candidate"
            );
        }

        let mut call = decode_body(selector, body, signature)?;
        call.candidates = candidates;
        Ok(call)
    }

    /// [`decode_call`](Self::decode_call) for `0x`-prefixed hex input.
    pub async fn decode_hex(&self, calldata: &str) -> Result<DecodedCall, PipelineError> {
        let bytes = parse_calldata_hex(calldata)?;
        self.decode_call(&bytes).await
    }
}

/// Decode full calldata against a caller-supplied signature, bypassing the
/// resolver. The signature must still hash to the calldata's selector.
pub fn decode_with_signature(
    calldata: &[u8],
    signature_text: &str,
) -> Result<DecodedCall, PipelineError> {
    let (selector, body) = split(calldata)?;
    let signature = signature::parse(signature_text)?;
    let computed = signature.selector();
    if computed != selector {
        debug!(%selector, %computed, signature = signature_text, "signature does not match calldata");
        return Err(PipelineError::SignatureMismatch {
            expected: selector,
            computed,
            signature: signature_text.to_string(),
        });
    }
    decode_body(selector, body, signature)
}

fn split(calldata: &[u8]) -> Result<(Selector, &[u8]), PipelineError> {
    Selector::split_calldata(calldata).ok_or_else(|| {
        debug!(len = calldata.len(), "calldata shorter than a selector");
        PipelineError::TruncatedCalldata {
            len: calldata.len(),
        }
    })
}

/// The first candidate that parses and hashes to `selector`.
///
/// If none qualifies, the first candidate's own failure is returned so the
/// error is deterministic.
fn choose_candidate(selector: Selector, candidates: &[String]) -> Result<Signature, PipelineError> {
    let mut first_failure = None;
    for text in candidates {
        let failure = match signature::parse(text) {
            Ok(sig) if sig.selector() == selector => return Ok(sig),
            Ok(sig) => {
                warn!(
                    %selector,
                    computed = %sig.selector(),
                    candidate = %text,
                    "registry candidate does not hash to selector, skipping"
                );
                PipelineError::SelectorMismatch {
                    expected: selector,
                    computed: sig.selector(),
                    signature: text.clone(),
                }
            }
            Err(e) => {
                warn!(%selector, candidate = %text, error = %e, "unparseable registry candidate, skipping");
                PipelineError::Syntax(e)
            }
        };
        first_failure.get_or_insert(failure);
    }

    let err = first_failure.unwrap_or(PipelineError::Resolve(ResolveError::NotFound { selector }));
    if err.is_internal() {
        error!(%selector, error = %err, kind = err.kind(), "no registry candidate matches selector");
    }
    Err(err)
}

fn decode_body(
    selector: Selector,
    body: &[u8],
    signature: Signature,
) -> Result<DecodedCall, PipelineError> {
    let values = calldecode_abi::decode(&signature.parameters, body).map_err(|e| {
        debug!(%selector, signature = %signature, error = %e, "argument decoding failed");
        PipelineError::from(e)
    })?;

    if values.len() != signature.parameters.len() {
        let err = PipelineError::LengthMismatch {
            expected: signature.parameters.len(),
            got: values.len(),
        };
        error!(%selector, signature = %signature, error = %err, "decoder invariant violated");
        return Err(err);
    }
    for (index, (value, param)) in values.iter().zip(&signature.parameters).enumerate() {
        if !value.matches(param) {
            let err = PipelineError::ValueTypeMismatch {
                index,
                expected: param.to_string(),
                got: value.param_type().to_string(),
            };
            error!(%selector, signature = %signature, error = %err, "decoder invariant violated");
            return Err(err);
        }
    }

    Ok(DecodedCall {
        selector,
        signature,
        arguments: values.into_iter().enumerate().collect(),
        candidates: Vec::new(),
    })
}
