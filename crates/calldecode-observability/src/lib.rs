//! # calldecode-observability
//!
//! Structured logging for CallDecode binaries and services.
//!
//! The library crates only emit `tracing` events; an application calls
//! [`init_tracing`] once at startup to decide where they go. Per-component
//! levels use the short crate names (`resolver`, `pipeline`, `abi`, `core`).

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, InitError, LogConfig};
