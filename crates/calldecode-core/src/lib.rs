//! # calldecode-core
//!
//! Core types and primitives shared across all CallDecode crates.
//! The ABI codec, the selector resolver and the decode pipeline are all
//! built on the interfaces defined here.
//!
//! - [`ParamType`] / [`DecodedValue`]: the closed type and value model
//! - [`Signature`]: a parsed function signature (see [`signature::parse`])
//! - [`Selector`]: the 4-byte function identifier
//! - [`DecodedCall`]: the structured result handed to renderers

pub mod call;
pub mod error;
pub mod selector;
pub mod signature;
pub mod types;

pub use call::{AmbiguousSelector, DecodedCall, RenderedParam};
pub use error::{CodecError, RegistryError, ResolveError, SyntaxError};
pub use selector::Selector;
pub use signature::Signature;
pub use types::{DecodedValue, ParamType, TupleField};

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;
