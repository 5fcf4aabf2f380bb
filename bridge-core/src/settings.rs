//! Registration settings supplied by the embedding service.

/// Environment name used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Plain configuration values consumed by the coordinator.
///
/// Loading these from files or the process environment is the caller's
/// concern; the coordinator only reads the final values.
#[derive(Clone, Debug)]
pub struct RegistrySettings {
    environment: String,
    health_check_path: Option<String>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            health_check_path: None,
        }
    }
}

impl RegistrySettings {
    /// Creates settings with the default environment and no health-check path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment name registered with the endpoint batch.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the health-check path advertised with the application.
    #[must_use]
    pub fn with_health_check_path(mut self, path: impl Into<String>) -> Self {
        self.health_check_path = Some(path.into());
        self
    }

    /// Returns the environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the health-check path, if configured.
    #[must_use]
    pub fn health_check_path(&self) -> Option<&str> {
        self.health_check_path.as_deref()
    }
}
