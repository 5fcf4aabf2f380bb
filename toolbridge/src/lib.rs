//! SDK facade for the toolbridge registry runtime.
//!
//! Depend on this crate via `cargo add toolbridge`. It bundles the internal
//! crates behind feature flags so downstream services can enable or disable
//! components as needed.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use bridge_primitives as primitives;

/// Deduction, collection, and registration pipeline (enabled by `core`).
#[cfg(feature = "core")]
pub use bridge_core as core;

/// HTTPS registry transport (enabled by `transport`).
#[cfg(feature = "transport")]
pub use bridge_transport as transport;
