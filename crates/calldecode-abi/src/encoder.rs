//! ABI encoder, the inverse of [`crate::decoder`].
//!
//! Converts `DecodedValue`s back into head/tail encoded bytes. Used for
//! round-trip testing and for building calldata fixtures.
//!
//! # Usage
//! ```ignore
//! let sig = calldecode_core::signature::parse("transfer(address,uint256)")?;
//! let calldata = encode_call(&sig, &[
//!     DecodedValue::Address(to),
//!     DecodedValue::uint256(1_000_000u64),
//! ])?;
//! ```

use calldecode_core::{CodecError, DecodedValue, ParamType, Signature, WORD_SIZE};

use crate::word;

/// Encode `values` as an implicit tuple.
///
/// Each value is validated against its own tag (integer widths, fixed byte
/// lengths, array element types); values that could not have come out of
/// the decoder are rejected.
pub fn encode(values: &[DecodedValue]) -> Result<Vec<u8>, CodecError> {
    encode_sequence(values)
}

/// Encode `values` after checking them against a declared parameter list.
pub fn encode_params(params: &[ParamType], values: &[DecodedValue]) -> Result<Vec<u8>, CodecError> {
    if params.len() != values.len() {
        return Err(CodecError::Encode {
            reason: format!(
                "argument count mismatch: expected {}, got {}",
                params.len(),
                values.len()
            ),
        });
    }
    for (i, (param, value)) in params.iter().zip(values).enumerate() {
        if !value.matches(param) {
            return Err(CodecError::Encode {
                reason: format!("argument {i}: expected {param}, got {}", value.param_type()),
            });
        }
    }
    encode(values)
}

/// Encode a full call: `selector ++ encode_params(signature.parameters, values)`.
pub fn encode_call(signature: &Signature, values: &[DecodedValue]) -> Result<Vec<u8>, CodecError> {
    let body = encode_params(&signature.parameters, values)?;
    let mut calldata = Vec::with_capacity(4 + body.len());
    calldata.extend_from_slice(signature.selector().as_bytes());
    calldata.extend_from_slice(&body);
    Ok(calldata)
}

fn encode_sequence(values: &[DecodedValue]) -> Result<Vec<u8>, CodecError> {
    let encoded = values
        .iter()
        .map(|v| Ok((v.is_dynamic(), encode_value(v)?)))
        .collect::<Result<Vec<_>, CodecError>>()?;

    let head_len: usize = encoded
        .iter()
        .map(|(dynamic, bytes)| if *dynamic { WORD_SIZE } else { bytes.len() })
        .sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (dynamic, bytes) in encoded {
        if dynamic {
            head.extend_from_slice(&word::encode_usize(head_len + tail.len()));
            tail.extend_from_slice(&bytes);
        } else {
            head.extend_from_slice(&bytes);
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

fn encode_value(value: &DecodedValue) -> Result<Vec<u8>, CodecError> {
    let bytes = match value {
        DecodedValue::Uint(v, bits) => word::encode_uint(*v, *bits)?.to_vec(),
        DecodedValue::Int(v, bits) => word::encode_int(*v, *bits)?.to_vec(),
        DecodedValue::Address(a) => word::encode_address(a).to_vec(),
        DecodedValue::Bool(b) => word::encode_bool(*b).to_vec(),
        DecodedValue::FixedBytes(b) => word::encode_fixed_bytes(b)?.to_vec(),
        DecodedValue::Bytes(b) => encode_payload(b),
        DecodedValue::String(s) => encode_payload(s.as_bytes()),
        DecodedValue::Array { elem, values } => {
            check_elements(elem, values)?;
            let mut out = word::encode_usize(values.len()).to_vec();
            out.extend(encode_sequence(values)?);
            out
        }
        DecodedValue::FixedArray { elem, values } => {
            if values.is_empty() {
                return Err(CodecError::Encode {
                    reason: format!("fixed array {elem}[0] is not a valid type"),
                });
            }
            check_elements(elem, values)?;
            encode_sequence(values)?
        }
        DecodedValue::Tuple(values) => {
            if values.is_empty() {
                return Err(CodecError::Encode {
                    reason: "empty tuple is not a valid type".into(),
                });
            }
            encode_sequence(values)?
        }
    };
    Ok(bytes)
}

fn check_elements(elem: &ParamType, values: &[DecodedValue]) -> Result<(), CodecError> {
    match values.iter().position(|v| !v.matches(elem)) {
        Some(i) => Err(CodecError::Encode {
            reason: format!(
                "array element {i}: expected {elem}, got {}",
                values[i].param_type()
            ),
        }),
        None => Ok(()),
    }
}

/// `uint256 length` followed by the content, zero-padded to a word boundary.
fn encode_payload(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut out = Vec::with_capacity(WORD_SIZE + padded);
    out.extend_from_slice(&word::encode_usize(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(WORD_SIZE + padded, 0);
    out
}
