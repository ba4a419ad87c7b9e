//! Reqwest-backed Payment Rails transport adapter.
//!
//! This adapter owns transport details only: URL construction, request
//! authentication, timeouts, and decoding response bodies into envelopes.
//! Interpreting the envelope is left to the gateways.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use super::signing::{SigningInput, TIMESTAMP_HEADER, authenticate};
use crate::config::{Config, ConfigurationError};
use crate::domain::json_type_name;
use crate::domain::ports::{ApiResponse, HttpTransport, OK_KEY, TransportError};

/// [`HttpTransport`] that performs requests with a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
}

impl ReqwestTransport {
    /// Build a transport using the system clock for request signing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the base URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: Arc<Config>) -> Result<Self, ConfigurationError> {
        Self::with_clock(config, Arc::new(DefaultClock))
    }

    /// Build a transport with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the base URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn with_clock(
        config: Arc<Config>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|error| ConfigurationError::HttpClient {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            base_url,
            config,
            clock,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        let url = endpoint(&self.base_url, path, query);
        let payload = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|error| {
                TransportError::invalid_request(format!("request body is not serialisable: {error}"))
            })?
            .unwrap_or_default();
        let credentials = self
            .config
            .credentials()
            .map_err(|error| TransportError::invalid_request(error.to_string()))?;
        let path_and_query = path_and_query(&url);
        let auth = authenticate(
            credentials,
            SigningInput {
                timestamp: self.clock.utc().timestamp(),
                method: method.as_str(),
                path_and_query: &path_and_query,
                body: &payload,
            },
        );

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, auth.authorization);
        if let Some(timestamp) = auth.timestamp {
            request = request.header(TIMESTAMP_HEADER, timestamp);
        }
        if body.is_some() {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        debug!(
            method = %method,
            path = %path_and_query,
            status = status.as_u16(),
            "payment rails request completed"
        );
        let body = decode_body(status, bytes.as_ref())?;
        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiResponse, TransportError> {
        self.send(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.send(Method::DELETE, path, &[], None).await
    }
}

/// Append `path` to the base URL's own path and attach the query pairs.
fn endpoint(base_url: &Url, path: &str, query: &[(String, String)]) -> Url {
    let mut url = base_url.clone();
    let prefix = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
    url.set_query(None);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }
    url
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// Decode a response body into an envelope map.
///
/// Error statuses never fail to decode: a body that is not a JSON object is
/// replaced by a non-ok envelope so the gateway can classify the status.
fn decode_body(status: StatusCode, bytes: &[u8]) -> Result<Map<String, Value>, TransportError> {
    let decoded = serde_json::from_slice::<Value>(bytes);
    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        return match decoded {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(TransportError::decode(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
            Err(error) => Err(TransportError::decode(format!(
                "invalid JSON payload: {error}"
            ))),
        };
    }
    let mut envelope = match decoded {
        Ok(Value::Object(map)) => map,
        Ok(errors @ Value::Array(_)) => Map::from_iter([("errors".to_owned(), errors)]),
        _ => Map::new(),
    };
    envelope
        .entry(OK_KEY)
        .or_insert(Value::Bool(false));
    Ok(envelope)
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::transport(error.to_string())
    }
}
