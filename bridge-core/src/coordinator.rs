//! Two-phase registration protocol against the tool registry.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use bridge_primitives::{AppManifest, OperationSpec};

use crate::collector::EndpointCollector;
use crate::deduce::deduce_endpoint;
use crate::settings::RegistrySettings;
use crate::transport::{AppUpdate, RegistryTransport};

/// Phases of a registration run.
///
/// The coordinator only ever moves forward: the application is registered
/// once, then the endpoint batch is registered once. A failed transition
/// leaves the phase where it was; there is no rollback and no retry inside
/// the core.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistrationPhase {
    /// The application is not yet known to the registry; endpoint discovery
    /// is gated off.
    Unregistered,
    /// The application is registered and endpoint discovery is active.
    AppRegistered,
    /// The endpoint batch has been registered; the run is complete.
    EndpointsRegistered,
}

impl RegistrationPhase {
    /// Returns `true` once the application is known to the registry.
    #[must_use]
    pub const fn is_app_registered(self) -> bool {
        !matches!(self, Self::Unregistered)
    }

    /// Returns `true` once the run is complete.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::EndpointsRegistered)
    }
}

#[derive(Debug)]
struct CoordinatorState {
    phase: RegistrationPhase,
    app_key: Option<String>,
    discovery_started: bool,
}

/// Drives the two-phase registration protocol.
///
/// Expected call sequence: [`register_application`](Self::register_application)
/// once, [`on_component_ready`](Self::on_component_ready) per discovered
/// component, then exactly one
/// [`finalize_registration`](Self::finalize_registration). Calls outside the
/// expected phase are logged no-ops; no failure ever propagates to the host.
pub struct RegistrationCoordinator {
    transport: Arc<dyn RegistryTransport>,
    collector: Arc<EndpointCollector>,
    settings: RegistrySettings,
    state: Mutex<CoordinatorState>,
}

impl fmt::Debug for RegistrationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().expect("coordinator state poisoned");
        f.debug_struct("RegistrationCoordinator")
            .field("transport", &"dyn RegistryTransport")
            .field("phase", &state.phase)
            .field("app_key", &state.app_key)
            .field("collected", &self.collector.len())
            .finish()
    }
}

impl RegistrationCoordinator {
    /// Creates a coordinator over the given transport and collector.
    ///
    /// The collector is passed in rather than owned globally so its lifetime
    /// is scoped to the run that uses it.
    #[must_use]
    pub fn new(
        transport: Arc<dyn RegistryTransport>,
        collector: Arc<EndpointCollector>,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            transport,
            collector,
            settings,
            state: Mutex::new(CoordinatorState {
                phase: RegistrationPhase::Unregistered,
                app_key: None,
                discovery_started: false,
            }),
        }
    }

    /// Returns the current phase.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn phase(&self) -> RegistrationPhase {
        self.state.lock().expect("coordinator state poisoned").phase
    }

    /// Returns the registered application key, once established.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn app_key(&self) -> Option<String> {
        self.state
            .lock()
            .expect("coordinator state poisoned")
            .app_key
            .clone()
    }

    /// Returns the collector this coordinator feeds.
    #[must_use]
    pub fn collector(&self) -> &EndpointCollector {
        &self.collector
    }

    /// Registers (or updates) the owning application with the registry.
    ///
    /// On success the coordinator moves to
    /// [`RegistrationPhase::AppRegistered`] and records the application key.
    /// On failure it logs (distinguishing unauthorized responses) and stays
    /// in [`RegistrationPhase::Unregistered`], which keeps endpoint
    /// discovery gated off. A repeat call after success is a logged no-op.
    pub async fn register_application(&self, manifest: &AppManifest) -> RegistrationPhase {
        {
            let state = self.state.lock().expect("coordinator state poisoned");
            if state.phase != RegistrationPhase::Unregistered {
                warn!(
                    app_key = manifest.key(),
                    phase = ?state.phase,
                    "application already registered; ignoring repeat registration"
                );
                return state.phase;
            }
        }

        let update = AppUpdate::from_manifest(manifest, &self.settings);
        info!(app_key = manifest.key(), "registering application with the tool registry");

        match self
            .transport
            .update_application(manifest.key(), &update)
            .await
        {
            Ok(response) => {
                info!(app_key = manifest.key(), %response, "application registered");
                let mut state = self.state.lock().expect("coordinator state poisoned");
                state.phase = RegistrationPhase::AppRegistered;
                state.app_key = Some(manifest.key().to_owned());
                state.phase
            }
            Err(err) if err.is_unauthorized() => {
                warn!(
                    app_key = manifest.key(),
                    "registry rejected the application update: unauthorized, check the API key"
                );
                RegistrationPhase::Unregistered
            }
            Err(err) => {
                warn!(?err, app_key = manifest.key(), "application registration failed");
                RegistrationPhase::Unregistered
            }
        }
    }

    /// Collects the descriptors for one discovered component.
    ///
    /// Does nothing while the application is unregistered. The collector is
    /// cleared once, before the first component of a run, as a safeguard
    /// against stale state from a previous round. A failing operation is
    /// logged and skipped without affecting the rest of the component.
    ///
    /// Returns the number of descriptors stored for this component.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn on_component_ready(&self, component: &str, operations: &[OperationSpec]) -> usize {
        {
            let mut state = self.state.lock().expect("coordinator state poisoned");
            if !state.phase.is_app_registered() {
                debug!(component, "application not registered; skipping endpoint discovery");
                return 0;
            }
            if !state.discovery_started {
                state.discovery_started = true;
                self.collector.clear();
            }
        }

        let mut stored = 0;
        for spec in operations {
            match deduce_endpoint(spec) {
                Ok(descriptor) => {
                    if self.collector.add(descriptor) {
                        stored += 1;
                    }
                }
                Err(err) => {
                    warn!(
                        ?err,
                        component,
                        handler = spec.shape().handler(),
                        "skipping operation with undeducible metadata"
                    );
                }
            }
        }

        debug!(component, stored, "component operations collected");
        stored
    }

    /// Registers the accumulated endpoint batch, completing the run.
    ///
    /// An empty snapshot completes the run without a network call. A
    /// transport failure is logged and leaves the phase at
    /// [`RegistrationPhase::AppRegistered`], so a caller-driven re-run of
    /// this method remains possible. Calls outside the app-registered phase
    /// are logged no-ops.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub async fn finalize_registration(&self) -> RegistrationPhase {
        let app_key = {
            let state = self.state.lock().expect("coordinator state poisoned");
            if state.phase != RegistrationPhase::AppRegistered {
                warn!(
                    phase = ?state.phase,
                    "finalize called outside the app-registered phase; ignoring"
                );
                return state.phase;
            }
            let Some(app_key) = state.app_key.clone() else {
                warn!("application key missing despite registered phase; ignoring finalize");
                return state.phase;
            };
            app_key
        };

        let snapshot = self.collector.snapshot();
        if snapshot.is_empty() {
            info!(%app_key, "no endpoints collected; skipping batch registration");
            let mut state = self.state.lock().expect("coordinator state poisoned");
            state.phase = RegistrationPhase::EndpointsRegistered;
            return state.phase;
        }

        info!(
            %app_key,
            endpoints = snapshot.len(),
            environment = self.settings.environment(),
            "registering endpoint batch"
        );

        match self
            .transport
            .register_endpoints_batch(&app_key, self.settings.environment(), &snapshot)
            .await
        {
            Ok(response) => {
                info!(%app_key, %response, "endpoint batch registered");
                let mut state = self.state.lock().expect("coordinator state poisoned");
                state.phase = RegistrationPhase::EndpointsRegistered;
                state.phase
            }
            Err(err) if err.is_unauthorized() => {
                warn!(
                    %app_key,
                    "registry rejected the endpoint batch: unauthorized, check the API key"
                );
                RegistrationPhase::AppRegistered
            }
            Err(err) => {
                warn!(?err, %app_key, "endpoint batch registration failed");
                RegistrationPhase::AppRegistered
            }
        }
    }

    /// Reports liveness for the registered application.
    ///
    /// Returns `true` when the registry acknowledged the heartbeat. Before
    /// the application is registered this is a logged no-op; failures are
    /// logged and swallowed like every other transport failure.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub async fn send_heartbeat(&self) -> bool {
        let app_key = {
            let state = self.state.lock().expect("coordinator state poisoned");
            if !state.phase.is_app_registered() {
                debug!("application not registered; skipping heartbeat");
                return false;
            }
            state.app_key.clone()
        };

        let Some(app_key) = app_key else {
            return false;
        };

        match self.transport.send_heartbeat(&app_key).await {
            Ok(response) => {
                debug!(%app_key, %response, "heartbeat acknowledged");
                true
            }
            Err(err) => {
                warn!(?err, %app_key, "heartbeat failed");
                false
            }
        }
    }
}
