//! # calldecode-abi
//!
//! Ethereum ABI codec over the [`ParamType`] / [`DecodedValue`] model of
//! `calldecode-core`.
//!
//! ## Implementation notes
//! - The parameter list is an implicit tuple: a head region of one slot per
//!   parameter followed by a tail region for dynamic payloads
//! - Dynamic offsets are relative to the start of the enclosing head region
//! - Every offset and length read from the input is bounds-checked before
//!   it is used; malformed input yields a [`CodecError`], never a panic
//! - Elementary padding rules are enforced strictly (see [`word`])

pub mod decoder;
pub mod encoder;
pub mod word;

pub use decoder::decode;
pub use encoder::{encode, encode_call, encode_params};

pub use calldecode_core::{CodecError, DecodedValue, ParamType};
