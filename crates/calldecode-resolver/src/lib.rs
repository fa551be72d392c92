//! # calldecode-resolver
//!
//! Maps 4-byte selectors to candidate signature texts.
//!
//! A [`SelectorResolver`] owns a [`SignatureRegistry`] and a TTL cache and is
//! meant to be built once and shared (`Arc<SelectorResolver>`) by every
//! decode call. Registries:
//!
//! - [`GithubRegistry`]: raw files from the ethereum-lists `4bytes` repository
//! - [`FourByteDirectory`]: the 4byte.directory JSON API
//! - [`MemoryRegistry`]: a static table, for tests and offline use
//!
//! # Usage
//! ```ignore
//! let resolver = SelectorResolver::from_config(&ResolverConfig::default())?;
//! let candidates = resolver.resolve("0xa9059cbb".parse()?).await?;
//! ```

pub mod cache;
pub mod config;
pub mod fourbyte;
pub mod github;
mod http;
pub mod registry;
pub mod resolver;
pub mod retry;

pub use cache::{CachedLookup, SelectorCache};
pub use config::{RegistrySource, ResolverConfig};
pub use fourbyte::FourByteDirectory;
pub use github::GithubRegistry;
pub use registry::{MemoryRegistry, SignatureRegistry};
pub use resolver::SelectorResolver;
pub use retry::{RetryConfig, RetryPolicy};
