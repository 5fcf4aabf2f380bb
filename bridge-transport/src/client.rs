//! Registry client speaking JSON over HTTPS.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, StatusCode, Uri};
use serde::Serialize;
use tokio::time::timeout;
use tracing::debug;

use bridge_core::{AppUpdate, RegistryTransport, TransportError, TransportResult};
use bridge_primitives::EndpointDescriptor;

use crate::http_client::{build_client, RegistryHttpClient};

/// Environment variable used when loading the API key automatically.
pub const REGISTRY_API_KEY_ENV: &str = "REGISTRY_API_KEY";

/// Header carrying the caller's API key.
const API_KEY_HEADER: &str = "X-API-KEY";

/// Configuration for the HTTPS registry transport.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl TransportConfig {
    /// Creates a configuration for the given registry base URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Configuration`] if the URL has no
    /// http/https scheme or does not parse.
    pub fn new(base_url: impl AsRef<str>) -> TransportResult<Self> {
        let sanitized = sanitize_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url: sanitized,
            api_key: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Creates a configuration, loading the API key from `REGISTRY_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Configuration`] if the URL is invalid.
    pub fn from_env(base_url: impl AsRef<str>) -> TransportResult<Self> {
        let mut config = Self::new(base_url)?;
        config.api_key = env::var(REGISTRY_API_KEY_ENV).ok();
        Ok(config)
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Registry transport that calls the HTTP registry API over HTTPS.
pub struct HttpRegistryTransport {
    client: RegistryHttpClient,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl fmt::Debug for HttpRegistryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistryTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpRegistryTransport {
    /// Constructs a transport from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Configuration`] if the API key is missing.
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            TransportError::configuration("registry transport requires an API key")
        })?;

        let client = build_client();

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key,
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, path: &str) -> TransportResult<Uri> {
        format!("{}{path}", self.base_url)
            .parse::<Uri>()
            .map_err(|err| TransportError::encode(format!("invalid registry URL: {err}")))
    }

    async fn execute<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> TransportResult<String> {
        let body = serde_json::to_vec(payload).map_err(|err| {
            TransportError::encode(format!("failed to encode registry payload: {err}"))
        })?;

        let uri = self.endpoint(path)?;
        debug!(%uri, method = %method, "sending registry request");

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .body(Body::from(body))
            .map_err(|err| {
                TransportError::encode(format!("failed to build registry request: {err}"))
            })?;

        let response = timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| TransportError::network("registry request timed out"))?
            .map_err(|err| TransportError::network(format!("registry request failed: {err}")))?;

        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            TransportError::network(format!("failed to read registry response: {err}"))
        })?;
        let text = String::from_utf8_lossy(&bytes).to_string();

        if status == StatusCode::UNAUTHORIZED {
            return Err(TransportError::Unauthorized);
        }
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl RegistryTransport for HttpRegistryTransport {
    async fn update_application(
        &self,
        app_key: &str,
        update: &AppUpdate,
    ) -> TransportResult<String> {
        self.execute(
            Method::PUT,
            &format!("registry/applications/{app_key}"),
            update,
        )
        .await
    }

    async fn register_endpoints_batch(
        &self,
        app_key: &str,
        environment: &str,
        endpoints: &[EndpointDescriptor],
    ) -> TransportResult<String> {
        let payload = BatchRequest {
            environment,
            endpoints,
        };
        self.execute(
            Method::POST,
            &format!("registry/applications/{app_key}/endpoints/batch"),
            &payload,
        )
        .await
    }

    async fn send_heartbeat(&self, app_key: &str) -> TransportResult<String> {
        let payload = HeartbeatRequest { app_key };
        self.execute(Method::POST, "registry/heartbeat", &payload)
            .await
    }
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    environment: &'a str,
    endpoints: &'a [EndpointDescriptor],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeartbeatRequest<'a> {
    app_key: &'a str,
}

fn sanitize_base_url(input: &str) -> TransportResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(TransportError::configuration(
            "registry base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| TransportError::configuration(format!("invalid registry base URL: {err}")))?;
    Ok(base)
}
