//! Errors returned by resource gateways.
//!
//! Every non-ok API response surfaces as [`GatewayError::ServiceUnavailable`].
//! Callers that only care that the call failed match that one variant;
//! callers that need to react differently to a missing record or a rejected
//! credential read its [`FailureCategory`].

use std::fmt;

use thiserror::Error;

use super::model::ModelError;
use super::ports::TransportError;
use super::result::{ApiErrorDetail, ApiErrorResponse};
use crate::config::ConfigurationError;

/// Failure class derived from the HTTP status of a non-ok response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Credentials were missing or rejected (401).
    Unauthorized,
    /// Credentials lack permission for the resource (403).
    Forbidden,
    /// The addressed record does not exist (404).
    NotFound,
    /// The request was rejected as invalid (400, 409, 422).
    Validation,
    /// The client exceeded its request allowance (429).
    RateLimited,
    /// The API is down for maintenance (503).
    Maintenance,
    /// Any other server-side failure (5xx).
    Server,
    /// A non-ok envelope with a status that names no specific cause.
    Unclassified,
}

impl FailureCategory {
    /// Classify a response status.
    ///
    /// # Examples
    /// ```
    /// use paymentrails::FailureCategory;
    ///
    /// assert_eq!(FailureCategory::from_status(404), FailureCategory::NotFound);
    /// assert_eq!(FailureCategory::from_status(502), FailureCategory::Server);
    /// ```
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            503 => Self::Maintenance,
            500..=599 => Self::Server,
            _ => Self::Unclassified,
        }
    }

    /// Stable snake-case label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::Maintenance => "maintenance",
            Self::Server => "server",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by gateway operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The API answered with a non-ok envelope.
    #[error("payment rails service unavailable ({category}, status {status}): {message}")]
    ServiceUnavailable {
        /// Failure class derived from the status.
        category: FailureCategory,
        /// HTTP status of the response.
        status: u16,
        /// First API error message, or a generic description.
        message: String,
        /// Parsed API error entries.
        errors: Vec<ApiErrorDetail>,
    },
    /// The response matched no envelope shape this SDK understands.
    #[error("unexpected payment rails response: {message}")]
    UnexpectedResponse {
        /// Description of the mismatch.
        message: String,
    },
    /// The transport failed before producing an envelope.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The gateway could not be constructed from its configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl GatewayError {
    /// Build the non-ok error for a response status and error payload.
    pub fn service_unavailable(status: u16, payload: &ApiErrorResponse) -> Self {
        let category = FailureCategory::from_status(status);
        let message = payload
            .first_message()
            .map_or_else(|| format!("request failed with status {status}"), str::to_owned);
        Self::ServiceUnavailable {
            category,
            status,
            message,
            errors: payload.errors().to_vec(),
        }
    }

    /// Build an unexpected-shape error.
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Failure category when this is a non-ok API response.
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::ServiceUnavailable { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Whether this is the generic non-ok API failure.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}

impl From<ModelError> for GatewayError {
    fn from(error: ModelError) -> Self {
        Self::unexpected_response(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Status classification and message selection.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(400, FailureCategory::Validation)]
    #[case(401, FailureCategory::Unauthorized)]
    #[case(403, FailureCategory::Forbidden)]
    #[case(404, FailureCategory::NotFound)]
    #[case(409, FailureCategory::Validation)]
    #[case(422, FailureCategory::Validation)]
    #[case(429, FailureCategory::RateLimited)]
    #[case(500, FailureCategory::Server)]
    #[case(503, FailureCategory::Maintenance)]
    #[case(200, FailureCategory::Unclassified)]
    #[case(418, FailureCategory::Unclassified)]
    fn statuses_map_to_categories(#[case] status: u16, #[case] expected: FailureCategory) {
        assert_eq!(FailureCategory::from_status(status), expected);
    }

    #[rstest]
    fn service_unavailable_prefers_api_message() {
        let payload = ApiErrorResponse::from_value(json!({
            "ok": false,
            "errors": [{"code": "not_found", "message": "Object not found"}]
        }));
        let error = GatewayError::service_unavailable(404, &payload);

        assert!(error.is_service_unavailable());
        assert_eq!(error.category(), Some(FailureCategory::NotFound));
        assert_eq!(
            error.to_string(),
            "payment rails service unavailable (not_found, status 404): Object not found"
        );
    }

    #[rstest]
    fn service_unavailable_falls_back_to_status_message() {
        let payload = ApiErrorResponse::from_value(json!({"ok": false}));
        let error = GatewayError::service_unavailable(503, &payload);

        assert_eq!(error.category(), Some(FailureCategory::Maintenance));
        assert!(error.to_string().ends_with("request failed with status 503"));
    }

    #[rstest]
    fn model_errors_become_unexpected_responses() {
        let error = GatewayError::from(ModelError::NotAnObject {
            model: "recipient",
            found: "array",
        });
        assert_eq!(
            error,
            GatewayError::unexpected_response("recipient payload must be a JSON object, found array")
        );
        assert_eq!(error.category(), None);
    }
}
