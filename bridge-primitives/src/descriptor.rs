//! Endpoint descriptors registered with the tool registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::method::HttpMethod;

/// Schema entry for one path or query parameter.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    ty: String,
    required: bool,
    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    default_value: Option<String>,
}

impl ParamSchema {
    /// Creates a schema entry from a declared type name and required flag.
    #[must_use]
    pub fn new(ty: impl Into<String>, required: bool) -> Self {
        Self {
            ty: ty.into(),
            required,
            default_value: None,
        }
    }

    /// Attaches a declared default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Returns whether the parameter is mandatory.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns the declared default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// Parameter mapping carried by a descriptor: deduced and typed, or an
/// explicit override (parsed JSON when the text looked structured, raw text
/// otherwise).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamsSpec {
    /// Structurally deduced parameter schemas, keyed by parameter name.
    Typed(BTreeMap<String, ParamSchema>),
    /// Explicit override that parsed as structured data.
    Json(Value),
    /// Explicit override kept as raw text.
    Raw(String),
}

/// Schema entry for one field of a structured payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    ty: String,
    required: bool,
}

impl FieldSchema {
    /// Creates a field schema from a declared type name and required flag.
    #[must_use]
    pub fn new(ty: impl Into<String>, required: bool) -> Self {
        Self {
            ty: ty.into(),
            required,
        }
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }
}

/// Deduced body schema: a generic object, a scalar, or a structured record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BodySchema {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, FieldSchema>>,
}

impl BodySchema {
    /// Schema for a generic key-value payload.
    #[must_use]
    pub fn generic_object() -> Self {
        Self {
            ty: "object".to_owned(),
            description: Some("Generic object/map".to_owned()),
            properties: None,
        }
    }

    /// Schema for a scalar payload of the given declared type.
    #[must_use]
    pub fn scalar(ty: impl Into<String>) -> Self {
        let ty = ty.into();
        let description = format!("Simple {ty} value");
        Self {
            ty,
            description: Some(description),
            properties: None,
        }
    }

    /// Schema for a structured payload enumerating its fields.
    #[must_use]
    pub fn structured(properties: BTreeMap<String, FieldSchema>) -> Self {
        Self {
            ty: "object".to_owned(),
            description: None,
            properties: Some(properties),
        }
    }

    /// Returns the schema's type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Returns the schema description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the enumerated properties of a structured payload.
    #[must_use]
    pub fn properties(&self) -> Option<&BTreeMap<String, FieldSchema>> {
        self.properties.as_ref()
    }
}

/// Body payload carried by a descriptor: deduced schema or explicit override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodySpec {
    /// Structurally deduced schema.
    Schema(BodySchema),
    /// Explicit override that parsed as structured data.
    Json(Value),
    /// Explicit override kept as raw text.
    Raw(String),
}

/// Identity triple of a descriptor; two descriptors with equal triples are
/// the same logical endpoint.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EndpointIdentity(String, String, HttpMethod);

/// One callable operation as registered with the tool registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    name: String,
    path: String,
    method: HttpMethod,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_public: bool,
    #[serde(default)]
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_params: Option<ParamsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_params: Option<ParamsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_body: Option<BodySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_body: Option<BodySpec>,
}

impl EndpointDescriptor {
    /// Creates a descriptor with empty description and no schemas.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            description: String::new(),
            is_public: false,
            content_type: String::new(),
            path_params: None,
            query_params: None,
            request_body: None,
            response_body: None,
        }
    }

    /// Sets the endpoint description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the public flag.
    #[must_use]
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the path-parameter schema.
    #[must_use]
    pub fn with_path_params(mut self, params: ParamsSpec) -> Self {
        self.path_params = Some(params);
        self
    }

    /// Sets the query-parameter schema.
    #[must_use]
    pub fn with_query_params(mut self, params: ParamsSpec) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Sets the request-body schema.
    #[must_use]
    pub fn with_request_body(mut self, body: BodySpec) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Sets the response-body schema.
    #[must_use]
    pub fn with_response_body(mut self, body: BodySpec) -> Self {
        self.response_body = Some(body);
        self
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Returns the endpoint description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the endpoint is publicly invocable.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    /// Returns the content type (may be empty; registry defaults apply).
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the path-parameter schema, if any.
    #[must_use]
    pub fn path_params(&self) -> Option<&ParamsSpec> {
        self.path_params.as_ref()
    }

    /// Returns the query-parameter schema, if any.
    #[must_use]
    pub fn query_params(&self) -> Option<&ParamsSpec> {
        self.query_params.as_ref()
    }

    /// Returns the request-body schema, if any.
    #[must_use]
    pub fn request_body(&self) -> Option<&BodySpec> {
        self.request_body.as_ref()
    }

    /// Returns the response-body schema, if any.
    #[must_use]
    pub fn response_body(&self) -> Option<&BodySpec> {
        self.response_body.as_ref()
    }

    /// Returns the identifying (name, path, method) triple.
    #[must_use]
    pub fn identity(&self) -> EndpointIdentity {
        EndpointIdentity(self.name.clone(), self.path.clone(), self.method.clone())
    }
}
