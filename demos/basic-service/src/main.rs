//! Walkthrough of the registration pipeline against an in-process registry.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use bridge_core::{
    AppUpdate, EndpointCollector, RegistrationCoordinator, RegistrySettings, RegistryTransport,
    TransportResult,
};
use bridge_primitives::{
    AppManifest, EndpointDescriptor, HttpMethod, OperationConfig, OperationShape, OperationSpec,
    ParamBinding, RouteShape, TypeShape,
};

/// Transport that logs every call instead of hitting the network.
struct LoggingTransport;

#[async_trait]
impl RegistryTransport for LoggingTransport {
    async fn update_application(
        &self,
        app_key: &str,
        update: &AppUpdate,
    ) -> TransportResult<String> {
        info!(app_key, ?update, "would update application");
        Ok("demo-update-ok".to_owned())
    }

    async fn register_endpoints_batch(
        &self,
        app_key: &str,
        environment: &str,
        endpoints: &[EndpointDescriptor],
    ) -> TransportResult<String> {
        info!(
            app_key,
            environment,
            count = endpoints.len(),
            "would register endpoint batch"
        );
        Ok("demo-batch-ok".to_owned())
    }

    async fn send_heartbeat(&self, app_key: &str) -> TransportResult<String> {
        info!(app_key, "would send heartbeat");
        Ok("demo-heartbeat-ok".to_owned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    info!("=== toolbridge: basic service demo ===");

    let collector = Arc::new(EndpointCollector::new());
    let coordinator = RegistrationCoordinator::new(
        Arc::new(LoggingTransport),
        collector.clone(),
        RegistrySettings::new()
            .with_environment("demo")
            .with_health_check_path("/health"),
    );

    // Phase 1: register the owning application.
    let manifest = AppManifest::builder("orders-service")
        .description("Order management API")
        .base_domain("https://orders.internal")
        .build()?;
    coordinator.register_application(&manifest).await;

    // Phase 2: components come up one at a time, each declaring operations.
    coordinator.on_component_ready("orders", &orders_operations()?);
    coordinator.on_component_ready("health", &health_operations()?);

    // Phase 3: everything is ready; push the batch once.
    coordinator.finalize_registration().await;
    coordinator.send_heartbeat().await;

    let batch = serde_json::to_string_pretty(&collector.snapshot())?;
    info!("registered endpoint batch:\n{batch}");

    Ok(())
}

fn orders_operations() -> Result<Vec<OperationSpec>> {
    let get_order = OperationSpec::new(
        OperationConfig::builder("/orders/{id}")
            .name("GetOrder")
            .description("Fetch one order by id")
            .public(true)
            .build()?,
        OperationShape::new("get_order")
            .route(RouteShape::new().verb(HttpMethod::Get))
            .param(ParamBinding::path("id").shaped_as::<u64>())
            .response(TypeShape::structured(
                "Order",
                vec![
                    bridge_primitives::FieldShape::new("id", "u64"),
                    bridge_primitives::FieldShape::new("total_cents", "i64"),
                ],
            )),
    );

    let create_order = OperationSpec::new(
        OperationConfig::builder("/orders")
            .name("CreateOrder")
            .description("Create a new order")
            .content_type("application/json")
            .build()?,
        OperationShape::new("create_order")
            .param(ParamBinding::body("payload").shaped(TypeShape::Map))
            .response_as::<u64>(),
    );

    Ok(vec![get_order, create_order])
}

fn health_operations() -> Result<Vec<OperationSpec>> {
    let ping = OperationSpec::new(
        OperationConfig::builder("/ping").name("Ping").build()?,
        OperationShape::new("ping").route(RouteShape::new().verb(HttpMethod::Get)),
    );

    Ok(vec![ping])
}
