//! Driven port for the HTTP transport that resource gateways talk through.
//!
//! The gateway only ever sees decoded envelopes. Signing, timeouts and
//! connection handling belong to the adapter behind this trait.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

/// Envelope key carrying the API's success flag.
pub const OK_KEY: &str = "ok";

/// Decoded response returned by an [`HttpTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code reported by the server.
    pub status: u16,
    /// JSON object decoded from the response body.
    pub body: Map<String, Value>,
}

impl ApiResponse {
    /// Wrap a status code and decoded body.
    pub fn new(status: u16, body: Map<String, Value>) -> Self {
        Self { status, body }
    }

    /// Whether the API reported success.
    ///
    /// The envelope's `ok` flag wins; when it is absent or `null` a 2xx
    /// status counts as success. Non-boolean flags are read loosely: zero,
    /// `""`, `"0"` and empty containers are false.
    pub fn is_ok(&self) -> bool {
        self.body
            .get(OK_KEY)
            .and_then(loose_truth)
            .unwrap_or_else(|| (200..300).contains(&self.status))
    }

    /// Look up one top-level envelope key, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key).filter(|value| !value.is_null())
    }

    /// Remove and return one top-level envelope key.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.body.remove(key).filter(|value| !value.is_null())
    }
}

fn loose_truth(flag: &Value) -> Option<bool> {
    match flag {
        Value::Null => None,
        Value::Bool(ok) => Some(*ok),
        Value::Number(number) => Some(number.as_f64().is_some_and(|value| value.abs() > 0.0)),
        Value::String(text) => Some(!(text.is_empty() || text == "0")),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(fields) => Some(!fields.is_empty()),
    }
}

define_port_error! {
    /// Errors surfaced by a transport before a response envelope exists.
    pub enum TransportError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "payment rails transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "payment rails request timed out: {message}",
        /// The response body could not be decoded into an envelope.
        Decode { message: String } =>
            "payment rails response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest { message: String } =>
            "payment rails request invalid: {message}",
    }
}

impl TransportError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Port for issuing one HTTP round trip against the Payment Rails API.
///
/// Paths are absolute API paths such as `/v1/recipients`; the adapter owns
/// the base URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a `GET` with the given query parameters.
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiResponse, TransportError>;

    /// Issue a `POST` with a JSON body.
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError>;

    /// Issue a `PATCH` with a JSON body.
    async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError>;

    /// Issue a `DELETE`.
    async fn delete(&self, path: &str) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    //! Envelope flag handling.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ApiResponse {
        let Value::Object(body) = body else {
            panic!("test bodies are objects");
        };
        ApiResponse::new(status, body)
    }

    #[rstest]
    #[case::explicit_true(500, json!({"ok": true}), true)]
    #[case::explicit_false(200, json!({"ok": false}), false)]
    #[case::missing_flag_success_status(204, json!({}), true)]
    #[case::missing_flag_error_status(404, json!({}), false)]
    #[case::null_flag_error_status(500, json!({"ok": null}), false)]
    #[case::numeric_one(500, json!({"ok": 1}), true)]
    #[case::numeric_zero(200, json!({"ok": 0}), false)]
    #[case::string_yes(500, json!({"ok": "yes"}), true)]
    #[case::string_zero(200, json!({"ok": "0"}), false)]
    #[case::empty_string(200, json!({"ok": ""}), false)]
    #[case::empty_array(200, json!({"ok": []}), false)]
    fn ok_flag_takes_precedence_over_status(
        #[case] status: u16,
        #[case] body: Value,
        #[case] expected: bool,
    ) {
        assert_eq!(response(status, body).is_ok(), expected);
    }

    #[rstest]
    fn null_keys_are_treated_as_absent() {
        let mut envelope = response(200, json!({"ok": true, "recipient": null}));
        assert!(envelope.get("recipient").is_none());
        assert!(envelope.take("recipient").is_none());
    }

    #[rstest]
    #[case(TransportError::transport("reset"), true)]
    #[case(TransportError::timeout("30s"), true)]
    #[case(TransportError::decode("not json"), false)]
    #[case(TransportError::invalid_request("bad path"), false)]
    fn only_network_failures_are_retryable(#[case] error: TransportError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }
}
