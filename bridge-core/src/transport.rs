//! Transport contract between the core and the tool registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use bridge_primitives::{AppManifest, EndpointDescriptor};

use crate::deduce::structured_override;
use crate::settings::RegistrySettings;

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors surfaced by registry transports.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport is misconfigured or missing credentials.
    #[error("transport not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// A registry payload could not be encoded or a URL could not be built.
    #[error("failed to encode registry request: {reason}")]
    Encode {
        /// Additional context for the failure.
        reason: String,
    },

    /// Network-level failure (connect, timeout, broken body).
    #[error("registry request failed: {reason}")]
    Network {
        /// Additional context for the failure.
        reason: String,
    },

    /// The registry rejected the API key.
    #[error("registry rejected the request: unauthorized")]
    Unauthorized,

    /// The registry answered with a non-success HTTP status.
    #[error("registry returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code returned by the registry.
        status: u16,
        /// Response body text, possibly truncated by the transport.
        body: String,
    },
}

impl TransportError {
    /// Convenience constructor for configuration failures.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for encoding failures.
    #[must_use]
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for network failures.
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    /// Returns `true` for authentication failures, which the coordinator
    /// reports differently from other transport errors.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Application-level payload sent with the update-application call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health_check_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security: Option<Value>,
}

impl AppUpdate {
    /// Builds the update payload from the manifest plus external settings.
    ///
    /// A security descriptor that looks like a structured literal is parsed;
    /// anything else is carried as raw text.
    #[must_use]
    pub fn from_manifest(manifest: &AppManifest, settings: &RegistrySettings) -> Self {
        let security = manifest.security().map(|raw| {
            structured_override(raw).unwrap_or_else(|| Value::String(raw.to_owned()))
        });

        Self {
            description: manifest.description().map(ToOwned::to_owned),
            base_domain: manifest.base_domain().map(ToOwned::to_owned),
            health_check_url: settings.health_check_path().map(ToOwned::to_owned),
            security,
        }
    }

    /// Returns the application description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the base domain, if any.
    #[must_use]
    pub fn base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }

    /// Returns the health-check URL, if any.
    #[must_use]
    pub fn health_check_url(&self) -> Option<&str> {
        self.health_check_url.as_deref()
    }

    /// Returns the security descriptor, if any.
    #[must_use]
    pub fn security(&self) -> Option<&Value> {
        self.security.as_ref()
    }
}

/// Trait implemented by registry transports.
///
/// The core treats these as opaque calls; timeouts, TLS, and retries are the
/// transport's concern. Raw response text is returned verbatim for logging.
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Registers or updates the owning application under its key.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any network or HTTP failure.
    async fn update_application(
        &self,
        app_key: &str,
        update: &AppUpdate,
    ) -> TransportResult<String>;

    /// Registers the full endpoint batch for an application/environment pair.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any network or HTTP failure.
    async fn register_endpoints_batch(
        &self,
        app_key: &str,
        environment: &str,
        endpoints: &[EndpointDescriptor],
    ) -> TransportResult<String>;

    /// Reports liveness for an already registered application.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any network or HTTP failure.
    async fn send_heartbeat(&self, app_key: &str) -> TransportResult<String>;
}
