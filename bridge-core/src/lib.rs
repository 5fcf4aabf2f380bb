//! Endpoint metadata deduction and registration pipeline.
//!
//! This crate turns discovered operations into endpoint descriptors, collects
//! them with deduplication, and drives the two-phase registration protocol
//! against the tool registry: register the owning application once, then
//! register the accumulated endpoint batch once.

#![warn(missing_docs, clippy::pedantic)]

mod collector;
mod coordinator;
mod deduce;
mod settings;
mod transport;

pub use collector::EndpointCollector;
pub use coordinator::{RegistrationCoordinator, RegistrationPhase};
pub use deduce::deduce_endpoint;
pub use settings::{RegistrySettings, DEFAULT_ENVIRONMENT};
pub use transport::{AppUpdate, RegistryTransport, TransportError, TransportResult};
