//! Core shared types for the toolbridge registry SDK.

#![warn(missing_docs, clippy::pedantic)]

mod descriptor;
mod error;
mod manifest;
mod method;
mod operation;
mod shape;

/// Endpoint descriptor and the schema values it carries.
pub use descriptor::{
    BodySchema, BodySpec, EndpointDescriptor, EndpointIdentity, FieldSchema, ParamSchema,
    ParamsSpec,
};
/// Error type and result alias shared across the SDK.
pub use error::{Error, Result};
/// Application-level record registered with the tool registry.
pub use manifest::{AppManifest, AppManifestBuilder};
/// HTTP method representation used throughout the descriptor model.
pub use method::HttpMethod;
/// Per-operation configuration and structural description.
pub use operation::{
    BindingKind, OperationConfig, OperationConfigBuilder, OperationShape, OperationSpec,
    ParamBinding, RouteShape,
};
/// Structural type description used for schema deduction.
pub use shape::{Describe, FieldShape, TypeShape};
