//! HTTPS transport for the toolbridge registry.
//!
//! Implements the [`bridge_core::RegistryTransport`] contract over hyper with
//! rustls. Wire format: JSON bodies, an `X-API-KEY` header on every call,
//! update-application as `PUT`, batch registration and heartbeat as `POST`.

#![warn(missing_docs, clippy::pedantic)]

mod client;
mod http_client;

pub use client::{HttpRegistryTransport, TransportConfig, REGISTRY_API_KEY_ENV};
