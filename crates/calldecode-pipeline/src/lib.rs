//! # calldecode-pipeline
//!
//! Turns raw calldata into a structured [`DecodedCall`]:
//!
//! 1. split the 4-byte selector from the argument body
//! 2. resolve the selector to candidate signature texts
//! 3. parse the chosen candidate
//! 4. ABI-decode the body against its parameter list
//!
//! The result carries no rendering; [`DecodedCall::render`] projects it to
//! per-parameter display strings for templates.
//!
//! # Usage
//! ```ignore
//! let config = DecoderConfig::from_yaml_file("calldecode.yaml")?;
//! calldecode_observability::init_tracing(&config.log)?;
//! let pipeline = DecodePipeline::from_config(&config.resolver)?;
//! let call = pipeline.decode_hex("0xa9059cbb000000...").await?;
//! for param in call.render() {
//!     println!("{} {} = {}", param.declared_type, param.binding, param.value);
//! }
//! ```

pub mod calldata;
pub mod config;
pub mod error;
pub mod pipeline;

pub use calldata::parse_calldata_hex;
pub use calldecode_core::{DecodedCall, RenderedParam};
pub use config::{ConfigError, DecoderConfig};
pub use error::PipelineError;
pub use pipeline::{decode_with_signature, DecodePipeline};
