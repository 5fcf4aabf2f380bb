//! Application-level record registered with the tool registry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity and metadata of the owning application.
///
/// Built once per process run; registration uses update semantics against
/// the established key, so the manifest never changes after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppManifest {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security: Option<String>,
}

impl AppManifest {
    /// Starts building a manifest for the given application key.
    #[must_use]
    pub fn builder(key: impl Into<String>) -> AppManifestBuilder {
        AppManifestBuilder {
            key: key.into(),
            description: None,
            base_domain: None,
            security: None,
        }
    }

    /// Returns the application key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the application description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the base domain the application serves from, if declared.
    #[must_use]
    pub fn base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }

    /// Returns the raw security descriptor text, if declared.
    #[must_use]
    pub fn security(&self) -> Option<&str> {
        self.security.as_deref()
    }
}

/// Builder for [`AppManifest`].
#[derive(Debug)]
pub struct AppManifestBuilder {
    key: String,
    description: Option<String>,
    base_domain: Option<String>,
    security: Option<String>,
}

impl AppManifestBuilder {
    /// Sets the application description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the base domain the application serves from.
    #[must_use]
    pub fn base_domain(mut self, base_domain: impl Into<String>) -> Self {
        self.base_domain = Some(base_domain.into());
        self
    }

    /// Attaches a raw security descriptor (JSON text or opaque reference).
    #[must_use]
    pub fn security(mut self, security: impl Into<String>) -> Self {
        self.security = Some(security.into());
        self
    }

    /// Consumes the builder and returns the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidManifest`] when the application key is empty.
    pub fn build(self) -> Result<AppManifest> {
        if self.key.trim().is_empty() {
            return Err(Error::invalid_manifest("application key cannot be empty"));
        }

        Ok(AppManifest {
            key: self.key,
            description: self.description,
            base_domain: self.base_domain,
            security: self.security,
        })
    }
}
