//! Result envelopes distinguishing domain objects from API error payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a call whose error payload is part of the normal contract.
///
/// Exactly one variant is populated per response.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult<T> {
    /// The API returned a valid domain object.
    Successful(T),
    /// The API returned a structured error payload.
    Error(ApiErrorResponse),
}

impl<T> GatewayResult<T> {
    /// Whether the successful variant is populated.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Successful(_))
    }

    /// Borrow the domain object, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Successful(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Borrow the error payload, if any.
    pub fn error(&self) -> Option<&ApiErrorResponse> {
        match self {
            Self::Successful(_) => None,
            Self::Error(errors) => Some(errors),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, ApiErrorResponse> {
        match self {
            Self::Successful(value) => Ok(value),
            Self::Error(errors) => Err(errors),
        }
    }
}

/// One entry of an API error payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code, e.g. `invalid_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Request field the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Structured error payload returned by the API.
///
/// Parsing is lenient: entries that do not look like error objects are
/// skipped, and the raw payload is kept for callers that need more.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorResponse {
    errors: Vec<ApiErrorDetail>,
    raw: Value,
}

impl ApiErrorResponse {
    /// Parse an error payload.
    ///
    /// Accepts an object with an `errors` array, a bare array of error
    /// objects, or a single error object.
    ///
    /// # Examples
    /// ```
    /// use paymentrails::ApiErrorResponse;
    /// use serde_json::json;
    ///
    /// let payload = ApiErrorResponse::from_value(json!({
    ///     "ok": false,
    ///     "errors": [{"code": "not_found", "message": "Object not found"}]
    /// }));
    /// assert_eq!(payload.first_message(), Some("Object not found"));
    /// ```
    pub fn from_value(raw: Value) -> Self {
        let entries: &[Value] = match &raw {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("errors") {
                Some(Value::Array(entries)) => entries,
                _ => std::slice::from_ref(&raw),
            },
            _ => &[],
        };
        let errors = entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| serde_json::from_value::<ApiErrorDetail>(entry.clone()).ok())
            .filter(|detail| detail != &ApiErrorDetail::default())
            .collect();
        Self { errors, raw }
    }

    /// Parsed error entries.
    pub fn errors(&self) -> &[ApiErrorDetail] {
        &self.errors
    }

    /// Payload exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Message of the first entry carrying one.
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .iter()
            .find_map(|detail| detail.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    //! Error payload parsing and result accessors.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::wrapped(json!({"errors": [{"code": "invalid_field", "field": "email", "message": "Email is invalid"}]}))]
    #[case::bare_array(json!([{"code": "invalid_field", "field": "email", "message": "Email is invalid"}]))]
    #[case::single_object(json!({"code": "invalid_field", "field": "email", "message": "Email is invalid"}))]
    fn accepts_each_payload_layout(#[case] raw: Value) {
        let payload = ApiErrorResponse::from_value(raw.clone());
        assert_eq!(
            payload.errors(),
            [ApiErrorDetail {
                code: Some("invalid_field".to_owned()),
                field: Some("email".to_owned()),
                message: Some("Email is invalid".to_owned()),
            }]
        );
        assert_eq!(payload.raw(), &raw);
    }

    #[rstest]
    #[case::scalar(json!("boom"))]
    #[case::unrelated_object(json!({"ok": false}))]
    #[case::junk_entries(json!({"errors": ["boom", 3, null]}))]
    fn unrecognised_payloads_yield_no_entries(#[case] raw: Value) {
        let payload = ApiErrorResponse::from_value(raw);
        assert!(payload.errors().is_empty());
        assert_eq!(payload.first_message(), None);
    }

    #[rstest]
    fn result_accessors_match_variant() {
        let ok: GatewayResult<u8> = GatewayResult::Successful(7);
        assert!(ok.is_success());
        assert_eq!(ok.success(), Some(&7));
        assert!(ok.error().is_none());
        assert_eq!(ok.into_result(), Ok(7));

        let failed: GatewayResult<u8> =
            GatewayResult::Error(ApiErrorResponse::from_value(json!([{"message": "nope"}])));
        assert!(!failed.is_success());
        assert_eq!(failed.error().and_then(ApiErrorResponse::first_message), Some("nope"));
        assert!(failed.into_result().is_err());
    }
}
