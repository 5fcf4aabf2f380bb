//! Metadata deduction: one operation in, one endpoint descriptor out.
//!
//! Pure function of its inputs, no I/O. Explicit configuration always wins
//! over structural deduction; a parameter whose type cannot be described is
//! omitted rather than failing the whole descriptor.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use bridge_primitives::{
    BindingKind, BodySchema, BodySpec, EndpointDescriptor, Error, FieldSchema, HttpMethod,
    OperationConfig, OperationSpec, ParamSchema, ParamsSpec, Result, RouteShape, TypeShape,
};

/// Builds a complete endpoint descriptor for one discovered operation.
///
/// # Errors
///
/// Returns [`Error::InvalidOperation`] when the configured route path is
/// empty; this is the only failure mode.
pub fn deduce_endpoint(spec: &OperationSpec) -> Result<EndpointDescriptor> {
    let config = spec.config();
    let shape = spec.shape();

    if config.path().trim().is_empty() {
        return Err(Error::invalid_operation("operation path cannot be empty"));
    }

    let name = config
        .name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| shape.handler());

    let method = resolve_method(config, shape.route_shape());
    let content_type = resolve_content_type(config, shape.route_shape());

    let mut descriptor = EndpointDescriptor::new(name, config.path(), method)
        .with_description(config.description())
        .with_public(config.is_public())
        .with_content_type(content_type);

    let deduced = deduce_bindings(spec);

    if let Some(params) = resolve_params(config.path_params(), deduced.path_params) {
        descriptor = descriptor.with_path_params(params);
    }
    if let Some(params) = resolve_params(config.query_params(), deduced.query_params) {
        descriptor = descriptor.with_query_params(params);
    }
    if let Some(body) = resolve_body(config.request_body(), deduced.request_body) {
        descriptor = descriptor.with_request_body(body);
    }
    if let Some(response) = shape.response_shape().map(classify_payload) {
        descriptor = descriptor.with_response_body(BodySpec::Schema(response));
    }

    Ok(descriptor)
}

/// Explicit non-default method wins verbatim; otherwise the routing metadata
/// decides, checking the canonical verbs in a fixed order before falling back
/// to the generic route's explicit verb list.
fn resolve_method(config: &OperationConfig, route: &RouteShape) -> HttpMethod {
    if *config.method() != HttpMethod::Post {
        return config.method().clone();
    }

    for candidate in [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ] {
        if route.verbs().contains(&candidate) {
            return candidate;
        }
    }

    if let Some(verb) = route.fallback_verbs().first() {
        return HttpMethod::parse(verb);
    }

    HttpMethod::Post
}

/// Routing metadata wins over the configured value, but only when the route
/// actually declares a consumed media type.
fn resolve_content_type(config: &OperationConfig, route: &RouteShape) -> String {
    route
        .consumed_media_types()
        .first()
        .cloned()
        .unwrap_or_else(|| config.content_type().to_owned())
}

struct DeducedBindings {
    path_params: BTreeMap<String, ParamSchema>,
    query_params: BTreeMap<String, ParamSchema>,
    request_body: Option<BodySchema>,
}

fn deduce_bindings(spec: &OperationSpec) -> DeducedBindings {
    let mut deduced = DeducedBindings {
        path_params: BTreeMap::new(),
        query_params: BTreeMap::new(),
        request_body: None,
    };

    for binding in spec.shape().params() {
        let Some(shape) = binding.shape() else {
            debug!(
                handler = spec.shape().handler(),
                param = binding.param(),
                "parameter type is not describable; omitting"
            );
            continue;
        };

        match binding.binding() {
            BindingKind::Path { required, .. } => {
                deduced.path_params.insert(
                    binding.schema_key().to_owned(),
                    ParamSchema::new(shape_type_name(shape), *required),
                );
            }
            BindingKind::Query {
                required, default, ..
            } => {
                let mut schema = ParamSchema::new(shape_type_name(shape), *required);
                if let Some(default) = default {
                    schema = schema.with_default(default.clone());
                }
                deduced
                    .query_params
                    .insert(binding.schema_key().to_owned(), schema);
            }
            BindingKind::Body => {
                if deduced.request_body.is_none() {
                    deduced.request_body = Some(classify_payload(shape));
                }
            }
        }
    }

    deduced
}

/// Three-way payload classification shared by request and response bodies.
fn classify_payload(shape: &TypeShape) -> BodySchema {
    match shape {
        TypeShape::Map => BodySchema::generic_object(),
        TypeShape::Scalar { name } => BodySchema::scalar(name.clone()),
        TypeShape::Structured { fields, .. } => {
            let properties = fields
                .iter()
                .map(|field| {
                    (
                        field.name().to_owned(),
                        FieldSchema::new(field.ty(), true),
                    )
                })
                .collect();
            BodySchema::structured(properties)
        }
    }
}

fn shape_type_name(shape: &TypeShape) -> &str {
    match shape {
        TypeShape::Map => "object",
        TypeShape::Scalar { name } | TypeShape::Structured { name, .. } => name,
    }
}

fn resolve_params(
    raw: Option<&str>,
    deduced: BTreeMap<String, ParamSchema>,
) -> Option<ParamsSpec> {
    if let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) {
        return Some(match structured_override(raw) {
            Some(value) => ParamsSpec::Json(value),
            None => ParamsSpec::Raw(raw.to_owned()),
        });
    }

    if deduced.is_empty() {
        None
    } else {
        Some(ParamsSpec::Typed(deduced))
    }
}

fn resolve_body(raw: Option<&str>, deduced: Option<BodySchema>) -> Option<BodySpec> {
    if let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) {
        return Some(match structured_override(raw) {
            Some(value) => BodySpec::Json(value),
            None => BodySpec::Raw(raw.to_owned()),
        });
    }

    deduced.map(BodySpec::Schema)
}

/// Parses override text that looks like a structured literal. Returns `None`
/// when the text is not braced or fails to parse; callers keep the raw text.
pub(crate) fn structured_override(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, "override text is not valid JSON; keeping raw text");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_primitives::{OperationShape, ParamBinding};

    fn spec(config: OperationConfig, shape: OperationShape) -> OperationSpec {
        OperationSpec::new(config, shape)
    }

    fn config(path: &str) -> OperationConfig {
        OperationConfig::builder(path).build().unwrap()
    }

    #[test]
    fn get_route_marker_wins_without_explicit_method() {
        let shape = OperationShape::new("ping").route(RouteShape::new().verb(HttpMethod::Get));
        let descriptor = deduce_endpoint(&spec(config("/ping"), shape)).unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Get);
    }

    #[test]
    fn explicit_method_wins_over_route_markers() {
        let cfg = OperationConfig::builder("/users/{id}")
            .method(HttpMethod::Delete)
            .build()
            .unwrap();
        let shape =
            OperationShape::new("remove_user").route(RouteShape::new().verb(HttpMethod::Get));

        let descriptor = deduce_endpoint(&spec(cfg, shape)).unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Delete);
    }

    #[test]
    fn canonical_verbs_are_checked_in_order() {
        let shape = OperationShape::new("upsert").route(
            RouteShape::new()
                .verb(HttpMethod::Patch)
                .verb(HttpMethod::Put),
        );
        let descriptor = deduce_endpoint(&spec(config("/items"), shape)).unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Put);
    }

    #[test]
    fn generic_route_falls_back_to_first_listed_verb() {
        let shape = OperationShape::new("link")
            .route(RouteShape::new().fallback_verb("LINK").fallback_verb("GET"));
        let descriptor = deduce_endpoint(&spec(config("/links"), shape)).unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Other("LINK".to_owned()));
    }

    #[test]
    fn method_defaults_to_post_without_routing_metadata() {
        let descriptor =
            deduce_endpoint(&spec(config("/submit"), OperationShape::new("submit"))).unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Post);
    }

    #[test]
    fn consumes_metadata_overrides_configured_content_type() {
        let cfg = OperationConfig::builder("/upload")
            .content_type("application/json")
            .build()
            .unwrap();
        let shape = OperationShape::new("upload")
            .route(RouteShape::new().consumes("multipart/form-data"));

        let descriptor = deduce_endpoint(&spec(cfg, shape)).unwrap();
        assert_eq!(descriptor.content_type(), "multipart/form-data");
    }

    #[test]
    fn configured_content_type_survives_absent_consumes() {
        let cfg = OperationConfig::builder("/upload")
            .content_type("application/json")
            .build()
            .unwrap();

        let descriptor = deduce_endpoint(&spec(cfg, OperationShape::new("upload"))).unwrap();
        assert_eq!(descriptor.content_type(), "application/json");
    }

    #[test]
    fn path_bound_parameter_becomes_path_param_entry() {
        let cfg = OperationConfig::builder("/users/{id}")
            .method(HttpMethod::Get)
            .build()
            .unwrap();
        let shape = OperationShape::new("get_user")
            .param(ParamBinding::path("id").shaped_as::<i64>());

        let descriptor = deduce_endpoint(&spec(cfg, shape)).unwrap();
        assert_eq!(descriptor.path(), "/users/{id}");
        assert_eq!(descriptor.method(), &HttpMethod::Get);

        let Some(ParamsSpec::Typed(params)) = descriptor.path_params() else {
            panic!("expected typed path params");
        };
        assert_eq!(params["id"], ParamSchema::new("i64", true));
    }

    #[test]
    fn query_default_is_recorded_only_when_declared() {
        let shape = OperationShape::new("list")
            .param(
                ParamBinding::query("page")
                    .shaped_as::<u32>()
                    .optional()
                    .default_value("1"),
            )
            .param(ParamBinding::query("filter").shaped_as::<String>());

        let descriptor = deduce_endpoint(&spec(config("/list"), shape)).unwrap();
        let Some(ParamsSpec::Typed(params)) = descriptor.query_params() else {
            panic!("expected typed query params");
        };
        assert_eq!(params["page"].default_value(), Some("1"));
        assert!(!params["page"].required());
        assert!(params["filter"].default_value().is_none());
        assert!(params["filter"].required());
    }

    #[test]
    fn declared_binding_name_overrides_parameter_name() {
        let shape = OperationShape::new("list").param(
            ParamBinding::query("page_number")
                .bound_name("page")
                .shaped_as::<u32>(),
        );

        let descriptor = deduce_endpoint(&spec(config("/list"), shape)).unwrap();
        let Some(ParamsSpec::Typed(params)) = descriptor.query_params() else {
            panic!("expected typed query params");
        };
        assert!(params.contains_key("page"));
        assert!(!params.contains_key("page_number"));
    }

    #[test]
    fn map_body_classifies_as_generic_object() {
        let shape = OperationShape::new("ingest")
            .param(ParamBinding::body("payload").shaped(TypeShape::Map));

        let descriptor = deduce_endpoint(&spec(config("/ingest"), shape)).unwrap();
        let Some(BodySpec::Schema(schema)) = descriptor.request_body() else {
            panic!("expected deduced body schema");
        };
        assert_eq!(schema.ty(), "object");
        assert_eq!(schema.description(), Some("Generic object/map"));
    }

    #[test]
    fn scalar_body_classifies_with_type_name() {
        let shape = OperationShape::new("rename")
            .param(ParamBinding::body("name").shaped_as::<String>());

        let descriptor = deduce_endpoint(&spec(config("/rename"), shape)).unwrap();
        let Some(BodySpec::Schema(schema)) = descriptor.request_body() else {
            panic!("expected deduced body schema");
        };
        assert_eq!(schema.ty(), "String");
        assert_eq!(schema.description(), Some("Simple String value"));
    }

    #[test]
    fn structured_body_enumerates_fields() {
        use bridge_primitives::FieldShape;

        let shape = OperationShape::new("create_user").param(
            ParamBinding::body("user").shaped(TypeShape::structured(
                "CreateUser",
                vec![
                    FieldShape::new("email", "String"),
                    FieldShape::new("age", "u32"),
                ],
            )),
        );

        let descriptor = deduce_endpoint(&spec(config("/users"), shape)).unwrap();
        let Some(BodySpec::Schema(schema)) = descriptor.request_body() else {
            panic!("expected deduced body schema");
        };
        assert_eq!(schema.ty(), "object");
        let properties = schema.properties().unwrap();
        assert_eq!(properties["email"], FieldSchema::new("String", true));
        assert_eq!(properties["age"], FieldSchema::new("u32", true));
    }

    #[test]
    fn response_body_follows_the_same_classification() {
        let shape = OperationShape::new("count").response_as::<u64>();
        let descriptor = deduce_endpoint(&spec(config("/count"), shape)).unwrap();

        let Some(BodySpec::Schema(schema)) = descriptor.response_body() else {
            panic!("expected deduced response schema");
        };
        assert_eq!(schema.ty(), "u64");
    }

    #[test]
    fn void_response_is_omitted() {
        let descriptor =
            deduce_endpoint(&spec(config("/fire"), OperationShape::new("fire"))).unwrap();
        assert!(descriptor.response_body().is_none());
    }

    #[test]
    fn undescribable_parameter_is_omitted_silently() {
        let shape = OperationShape::new("mixed")
            .param(ParamBinding::path("id"))
            .param(ParamBinding::query("page").shaped_as::<u32>());

        let descriptor = deduce_endpoint(&spec(config("/mixed/{id}"), shape)).unwrap();
        assert!(descriptor.path_params().is_none());
        assert!(descriptor.query_params().is_some());
    }

    #[test]
    fn non_empty_override_wins_over_deduction() {
        let cfg = OperationConfig::builder("/users/{id}")
            .path_params(r#"{"id": {"type": "uuid", "required": true}}"#)
            .build()
            .unwrap();
        let shape = OperationShape::new("get_user")
            .param(ParamBinding::path("id").shaped_as::<i64>());

        let descriptor = deduce_endpoint(&spec(cfg, shape)).unwrap();
        let Some(ParamsSpec::Json(value)) = descriptor.path_params() else {
            panic!("expected parsed override");
        };
        assert_eq!(value["id"]["type"], "uuid");
    }

    #[test]
    fn unparseable_braced_override_degrades_to_raw_text() {
        let cfg = OperationConfig::builder("/search")
            .query_params("{not valid json")
            .build()
            .unwrap();

        let descriptor = deduce_endpoint(&spec(cfg, OperationShape::new("search"))).unwrap();
        assert_eq!(
            descriptor.query_params(),
            Some(&ParamsSpec::Raw("{not valid json".to_owned()))
        );
    }

    #[test]
    fn unbraced_override_is_kept_as_raw_text() {
        let cfg = OperationConfig::builder("/ingest")
            .request_body("see upstream docs")
            .build()
            .unwrap();

        let descriptor = deduce_endpoint(&spec(cfg, OperationShape::new("ingest"))).unwrap();
        assert_eq!(
            descriptor.request_body(),
            Some(&BodySpec::Raw("see upstream docs".to_owned()))
        );
    }

    #[test]
    fn name_falls_back_to_handler() {
        let descriptor =
            deduce_endpoint(&spec(config("/ping"), OperationShape::new("ping_handler"))).unwrap();
        assert_eq!(descriptor.name(), "ping_handler");

        let named = OperationConfig::builder("/ping")
            .name("Ping")
            .build()
            .unwrap();
        let descriptor =
            deduce_endpoint(&spec(named, OperationShape::new("ping_handler"))).unwrap();
        assert_eq!(descriptor.name(), "Ping");
    }

    #[test]
    fn empty_path_errors() {
        let cfg: OperationConfig = serde_json::from_str(r#"{"path": ""}"#).unwrap();
        let err = deduce_endpoint(&spec(cfg, OperationShape::new("broken")))
            .expect_err("empty path should fail");
        assert!(matches!(err, Error::InvalidOperation { .. }));
    }
}
