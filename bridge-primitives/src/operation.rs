//! Per-operation configuration and structural description.
//!
//! An [`OperationSpec`] pairs the caller-supplied configuration (name, path,
//! overrides) with a structural description of the handler itself (routing
//! metadata, parameter bindings, response shape). The deducer combines both
//! into an [`crate::EndpointDescriptor`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::method::HttpMethod;
use crate::shape::{Describe, TypeShape};

/// Caller-supplied configuration for one operation.
///
/// Replaces annotation-style metadata with an explicit value object; every
/// field other than `path` is optional and falls back to deduction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    path: String,
    #[serde(default)]
    method: HttpMethod,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_public: bool,
    #[serde(default)]
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_body: Option<String>,
}

impl OperationConfig {
    /// Starts building a configuration for the given route path.
    #[must_use]
    pub fn builder(path: impl Into<String>) -> OperationConfigBuilder {
        OperationConfigBuilder {
            name: None,
            path: path.into(),
            method: HttpMethod::default(),
            description: String::new(),
            is_public: false,
            content_type: String::new(),
            path_params: None,
            query_params: None,
            request_body: None,
        }
    }

    /// Returns the explicit endpoint name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the configured HTTP method (POST unless set explicitly).
    #[must_use]
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Returns the endpoint description (may be empty).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the endpoint is publicly invocable.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    /// Returns the content-type override (empty = unset).
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the raw path-parameter override, if any.
    #[must_use]
    pub fn path_params(&self) -> Option<&str> {
        self.path_params.as_deref()
    }

    /// Returns the raw query-parameter override, if any.
    #[must_use]
    pub fn query_params(&self) -> Option<&str> {
        self.query_params.as_deref()
    }

    /// Returns the raw request-body override, if any.
    #[must_use]
    pub fn request_body(&self) -> Option<&str> {
        self.request_body.as_deref()
    }
}

/// Builder for [`OperationConfig`].
#[derive(Debug)]
pub struct OperationConfigBuilder {
    name: Option<String>,
    path: String,
    method: HttpMethod,
    description: String,
    is_public: bool,
    content_type: String,
    path_params: Option<String>,
    query_params: Option<String>,
    request_body: Option<String>,
}

impl OperationConfigBuilder {
    /// Sets an explicit endpoint name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets an explicit HTTP method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the endpoint description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the endpoint as publicly invocable.
    #[must_use]
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Sets an explicit content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Supplies a raw override for the path-parameter schema.
    #[must_use]
    pub fn path_params(mut self, raw: impl Into<String>) -> Self {
        self.path_params = Some(raw.into());
        self
    }

    /// Supplies a raw override for the query-parameter schema.
    #[must_use]
    pub fn query_params(mut self, raw: impl Into<String>) -> Self {
        self.query_params = Some(raw.into());
        self
    }

    /// Supplies a raw override for the request-body schema.
    #[must_use]
    pub fn request_body(mut self, raw: impl Into<String>) -> Self {
        self.request_body = Some(raw.into());
        self
    }

    /// Consumes the builder and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] when the route path is empty.
    pub fn build(self) -> Result<OperationConfig> {
        if self.path.trim().is_empty() {
            return Err(Error::invalid_operation("operation path cannot be empty"));
        }

        Ok(OperationConfig {
            name: self.name,
            path: self.path,
            method: self.method,
            description: self.description,
            is_public: self.is_public,
            content_type: self.content_type,
            path_params: self.path_params,
            query_params: self.query_params,
            request_body: self.request_body,
        })
    }
}

/// Routing metadata declared by the handler itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteShape {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    verbs: Vec<HttpMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fallback_verbs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    consumes: Vec<String>,
}

impl RouteShape {
    /// Creates an empty route shape (no markers, no media types).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dedicated verb marker.
    #[must_use]
    pub fn verb(mut self, method: HttpMethod) -> Self {
        self.verbs.push(method);
        self
    }

    /// Adds a verb to the generic route's explicit verb list.
    #[must_use]
    pub fn fallback_verb(mut self, verb: impl Into<String>) -> Self {
        self.fallback_verbs.push(verb.into());
        self
    }

    /// Adds a consumed media type.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.push(media_type.into());
        self
    }

    /// Returns the dedicated verb markers.
    #[must_use]
    pub fn verbs(&self) -> &[HttpMethod] {
        &self.verbs
    }

    /// Returns the generic route's explicit verb list.
    #[must_use]
    pub fn fallback_verbs(&self) -> &[String] {
        &self.fallback_verbs
    }

    /// Returns the consumed media types.
    #[must_use]
    pub fn consumed_media_types(&self) -> &[String] {
        &self.consumes
    }
}

/// How a formal parameter binds to the incoming request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingKind {
    /// Bound to a path segment.
    Path {
        /// Declared binding name; the parameter's own name applies when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Whether the binding is mandatory.
        required: bool,
    },
    /// Bound to a query-string parameter.
    Query {
        /// Declared binding name; the parameter's own name applies when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Whether the binding is mandatory.
        required: bool,
        /// Declared default value, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// Bound to the request body.
    Body,
}

/// A formal parameter of an operation together with its binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamBinding {
    param: String,
    binding: BindingKind,
    /// `None` means the parameter's type could not be described; the deducer
    /// omits the entry rather than failing the descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape: Option<TypeShape>,
}

impl ParamBinding {
    /// Creates a path-bound parameter (required by default).
    #[must_use]
    pub fn path(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            binding: BindingKind::Path {
                name: None,
                required: true,
            },
            shape: None,
        }
    }

    /// Creates a query-bound parameter (required by default, no default value).
    #[must_use]
    pub fn query(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            binding: BindingKind::Query {
                name: None,
                required: true,
                default: None,
            },
            shape: None,
        }
    }

    /// Creates a body-bound parameter.
    #[must_use]
    pub fn body(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            binding: BindingKind::Body,
            shape: None,
        }
    }

    /// Sets the binding's declared name (path and query bindings only).
    #[must_use]
    pub fn bound_name(mut self, name: impl Into<String>) -> Self {
        match &mut self.binding {
            BindingKind::Path { name: slot, .. } | BindingKind::Query { name: slot, .. } => {
                *slot = Some(name.into());
            }
            BindingKind::Body => {}
        }
        self
    }

    /// Marks the binding as optional (path and query bindings only).
    #[must_use]
    pub fn optional(mut self) -> Self {
        match &mut self.binding {
            BindingKind::Path { required, .. } | BindingKind::Query { required, .. } => {
                *required = false;
            }
            BindingKind::Body => {}
        }
        self
    }

    /// Declares a default value (query bindings only).
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        if let BindingKind::Query { default, .. } = &mut self.binding {
            *default = Some(value.into());
        }
        self
    }

    /// Attaches an explicit type shape.
    #[must_use]
    pub fn shaped(mut self, shape: TypeShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Attaches the type shape of `T`.
    #[must_use]
    pub fn shaped_as<T: Describe>(self) -> Self {
        self.shaped(T::type_shape())
    }

    /// Returns the parameter's own name.
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Returns how the parameter binds to the request.
    #[must_use]
    pub fn binding(&self) -> &BindingKind {
        &self.binding
    }

    /// Returns the parameter's type shape, if describable.
    #[must_use]
    pub fn shape(&self) -> Option<&TypeShape> {
        self.shape.as_ref()
    }

    /// Returns the effective schema key: the declared binding name when
    /// given, the parameter's own name otherwise.
    #[must_use]
    pub fn schema_key(&self) -> &str {
        match &self.binding {
            BindingKind::Path { name, .. } | BindingKind::Query { name, .. } => {
                name.as_deref().unwrap_or(&self.param)
            }
            BindingKind::Body => &self.param,
        }
    }
}

/// Structural description of one handler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationShape {
    handler: String,
    #[serde(default)]
    route: RouteShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<ParamBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<TypeShape>,
}

impl OperationShape {
    /// Creates a shape for the named handler with no routing metadata,
    /// parameters, or response.
    #[must_use]
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            route: RouteShape::default(),
            params: Vec::new(),
            response: None,
        }
    }

    /// Sets the routing metadata.
    #[must_use]
    pub fn route(mut self, route: RouteShape) -> Self {
        self.route = route;
        self
    }

    /// Appends a parameter binding.
    #[must_use]
    pub fn param(mut self, binding: ParamBinding) -> Self {
        self.params.push(binding);
        self
    }

    /// Sets the response type shape.
    #[must_use]
    pub fn response(mut self, shape: TypeShape) -> Self {
        self.response = Some(shape);
        self
    }

    /// Sets the response shape to that of `T`.
    #[must_use]
    pub fn response_as<T: Describe>(self) -> Self {
        self.response(T::type_shape())
    }

    /// Returns the handler identifier.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Returns the routing metadata.
    #[must_use]
    pub fn route_shape(&self) -> &RouteShape {
        &self.route
    }

    /// Returns the parameter bindings.
    #[must_use]
    pub fn params(&self) -> &[ParamBinding] {
        &self.params
    }

    /// Returns the response type shape, if the handler returns a value.
    #[must_use]
    pub fn response_shape(&self) -> Option<&TypeShape> {
        self.response.as_ref()
    }
}

/// One discovered operation: configuration plus structural description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    config: OperationConfig,
    shape: OperationShape,
}

impl OperationSpec {
    /// Pairs a configuration with its handler's structural description.
    #[must_use]
    pub fn new(config: OperationConfig, shape: OperationShape) -> Self {
        Self { config, shape }
    }

    /// Returns the caller-supplied configuration.
    #[must_use]
    pub fn config(&self) -> &OperationConfig {
        &self.config
    }

    /// Returns the handler's structural description.
    #[must_use]
    pub fn shape(&self) -> &OperationShape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_config_with_defaults() {
        let config = OperationConfig::builder("/ping").build().unwrap();

        assert_eq!(config.path(), "/ping");
        assert_eq!(config.method(), &HttpMethod::Post);
        assert!(config.name().is_none());
        assert!(!config.is_public());
        assert!(config.content_type().is_empty());
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = OperationConfig::builder("  ")
            .build()
            .expect_err("blank path should fail");
        assert!(matches!(err, Error::InvalidOperation { .. }));
    }

    #[test]
    fn schema_key_prefers_declared_binding_name() {
        let binding = ParamBinding::query("page_number").bound_name("page");
        assert_eq!(binding.schema_key(), "page");

        let unnamed = ParamBinding::path("id");
        assert_eq!(unnamed.schema_key(), "id");
    }

    #[test]
    fn default_value_only_applies_to_query_bindings() {
        let path = ParamBinding::path("id").default_value("7");
        assert!(matches!(
            path.binding(),
            BindingKind::Path { required: true, .. }
        ));

        let query = ParamBinding::query("page").default_value("1");
        let BindingKind::Query { default, .. } = query.binding() else {
            panic!("expected query binding");
        };
        assert_eq!(default.as_deref(), Some("1"));
    }

    #[test]
    fn shape_collects_route_params_and_response() {
        let shape = OperationShape::new("list_users")
            .route(RouteShape::new().verb(HttpMethod::Get).consumes("application/json"))
            .param(ParamBinding::query("page").shaped_as::<u32>())
            .response_as::<String>();

        assert_eq!(shape.handler(), "list_users");
        assert_eq!(shape.route_shape().verbs(), &[HttpMethod::Get]);
        assert_eq!(shape.params().len(), 1);
        assert_eq!(shape.response_shape(), Some(&TypeShape::scalar("String")));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = OperationConfig::builder("/users/{id}")
            .name("GetUser")
            .method(HttpMethod::Get)
            .public(true)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: OperationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
