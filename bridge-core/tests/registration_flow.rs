//! End-to-end flow: register the application, discover components, finalize.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bridge_core::{
    AppUpdate, EndpointCollector, RegistrationCoordinator, RegistrationPhase, RegistrySettings,
    RegistryTransport, TransportResult,
};
use bridge_primitives::{
    AppManifest, BodySpec, EndpointDescriptor, HttpMethod, OperationConfig, OperationShape,
    OperationSpec, ParamBinding, ParamsSpec, RouteShape, TypeShape,
};

struct RecordingTransport {
    updates: AtomicUsize,
    batches: AtomicUsize,
    last_update: Mutex<Option<(String, AppUpdate)>>,
    last_batch: Mutex<Option<(String, String, Vec<EndpointDescriptor>)>>,
}

impl RecordingTransport {
    fn new() -> Self {
        Self {
            updates: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            last_update: Mutex::new(None),
            last_batch: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RegistryTransport for RecordingTransport {
    async fn update_application(
        &self,
        app_key: &str,
        update: &AppUpdate,
    ) -> TransportResult<String> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().unwrap() = Some((app_key.to_owned(), update.clone()));
        Ok("update-ok".to_owned())
    }

    async fn register_endpoints_batch(
        &self,
        app_key: &str,
        environment: &str,
        endpoints: &[EndpointDescriptor],
    ) -> TransportResult<String> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock().unwrap() = Some((
            app_key.to_owned(),
            environment.to_owned(),
            endpoints.to_vec(),
        ));
        Ok("batch-ok".to_owned())
    }

    async fn send_heartbeat(&self, _app_key: &str) -> TransportResult<String> {
        Ok("heartbeat-ok".to_owned())
    }
}

fn manifest() -> AppManifest {
    AppManifest::builder("orders-service")
        .description("Order management API")
        .base_domain("https://orders.internal")
        .security(r#"{"scheme": "bearer"}"#)
        .build()
        .unwrap()
}

fn user_component() -> Vec<OperationSpec> {
    let get_user = OperationSpec::new(
        OperationConfig::builder("/users/{id}")
            .name("GetUser")
            .public(true)
            .build()
            .unwrap(),
        OperationShape::new("get_user")
            .route(RouteShape::new().verb(HttpMethod::Get))
            .param(ParamBinding::path("id").shaped_as::<i64>())
            .response_as::<String>(),
    );

    let create_user = OperationSpec::new(
        OperationConfig::builder("/users")
            .name("CreateUser")
            .build()
            .unwrap(),
        OperationShape::new("create_user")
            .param(ParamBinding::body("payload").shaped(TypeShape::Map)),
    );

    vec![get_user, create_user]
}

fn ping_component() -> Vec<OperationSpec> {
    let ping = OperationSpec::new(
        OperationConfig::builder("/ping").name("ping").build().unwrap(),
        OperationShape::new("ping").route(RouteShape::new().verb(HttpMethod::Get)),
    );
    vec![ping]
}

#[tokio::test]
async fn full_registration_round() {
    let transport = Arc::new(RecordingTransport::new());
    let collector = Arc::new(EndpointCollector::new());
    let coordinator = RegistrationCoordinator::new(
        transport.clone(),
        collector.clone(),
        RegistrySettings::new()
            .with_environment("staging")
            .with_health_check_path("/health"),
    );

    // Phase 1: the application must be registered before anything is collected.
    assert_eq!(coordinator.phase(), RegistrationPhase::Unregistered);
    coordinator.on_component_ready("early", &ping_component());
    assert!(collector.is_empty());

    coordinator.register_application(&manifest()).await;
    assert_eq!(coordinator.phase(), RegistrationPhase::AppRegistered);

    let (app_key, update) = transport.last_update.lock().unwrap().clone().unwrap();
    assert_eq!(app_key, "orders-service");
    assert_eq!(update.health_check_url(), Some("/health"));
    assert_eq!(update.security().unwrap()["scheme"], "bearer");

    // Phase 2: discovery, with a duplicate ping across two components.
    coordinator.on_component_ready("users", &user_component());
    coordinator.on_component_ready("ping-a", &ping_component());
    coordinator.on_component_ready("ping-b", &ping_component());
    assert_eq!(collector.len(), 3);

    // Phase 3: one batch call carrying everything.
    let phase = coordinator.finalize_registration().await;
    assert_eq!(phase, RegistrationPhase::EndpointsRegistered);
    assert_eq!(transport.batches.load(Ordering::SeqCst), 1);

    let (batch_key, environment, endpoints) =
        transport.last_batch.lock().unwrap().clone().unwrap();
    assert_eq!(batch_key, "orders-service");
    assert_eq!(environment, "staging");
    assert_eq!(endpoints.len(), 3);

    let get_user = endpoints
        .iter()
        .find(|endpoint| endpoint.name() == "GetUser")
        .unwrap();
    assert_eq!(get_user.method(), &HttpMethod::Get);
    assert!(get_user.is_public());
    let Some(ParamsSpec::Typed(params)) = get_user.path_params() else {
        panic!("expected typed path params");
    };
    assert_eq!(params["id"].ty(), "i64");

    let create_user = endpoints
        .iter()
        .find(|endpoint| endpoint.name() == "CreateUser")
        .unwrap();
    let Some(BodySpec::Schema(schema)) = create_user.request_body() else {
        panic!("expected deduced body schema");
    };
    assert_eq!(schema.ty(), "object");

    // A second finalize neither re-sends nor regresses.
    coordinator.finalize_registration().await;
    assert_eq!(transport.batches.load(Ordering::SeqCst), 1);
    assert!(coordinator.phase().is_final());
}
