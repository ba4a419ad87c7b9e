//! Transaction value object and envelope verification.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::GatewayError;
use super::model::{ModelError, lenient_id, object_fields, str_field};
use super::result::{ApiErrorResponse, GatewayResult};

const MODEL: &str = "transaction";

/// Envelope key carrying a transaction object.
pub const TRANSACTION_KEY: &str = "transaction";

/// Envelope key carrying an error payload.
pub const API_ERROR_RESPONSE_KEY: &str = "apiErrorResponse";

/// Identifier of a transaction as issued by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction record; every received field is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Transaction {
    id: Option<TransactionId>,
    fields: Map<String, Value>,
}

impl Transaction {
    /// Build a transaction from a decoded `transaction` JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] when the payload is not a JSON
    /// object.
    pub fn factory(value: Value) -> Result<Self, ModelError> {
        let fields = object_fields(MODEL, value)?;
        Ok(Self {
            id: lenient_id(&fields).map(TransactionId),
            fields,
        })
    }

    /// Transaction identifier, when `id` is a non-blank string or a number.
    pub fn id(&self) -> Option<&TransactionId> {
        self.id.as_ref()
    }

    /// Processing status, when reported.
    pub fn status(&self) -> Option<&str> {
        str_field(&self.fields, "status")
    }

    /// Look up any field by its API name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields exactly as received.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Transaction {
    type Error = ModelError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::factory(Value::Object(fields))
    }
}

impl From<Transaction> for Map<String, Value> {
    fn from(transaction: Transaction) -> Self {
        transaction.fields
    }
}

/// Shape of a transaction response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEnvelope {
    /// Envelope carries a non-null `transaction`.
    Transaction(Value),
    /// Envelope carries a non-null `apiErrorResponse`.
    ApiErrorResponse(Value),
    /// Envelope carries neither.
    Unrecognised,
}

impl TransactionEnvelope {
    /// Classify an envelope. `transaction` wins when both keys are present.
    pub fn classify(response: &Map<String, Value>) -> Self {
        let present = |key: &str| response.get(key).filter(|value| !value.is_null()).cloned();
        if let Some(transaction) = present(TRANSACTION_KEY) {
            return Self::Transaction(transaction);
        }
        if let Some(errors) = present(API_ERROR_RESPONSE_KEY) {
            return Self::ApiErrorResponse(errors);
        }
        Self::Unrecognised
    }
}

/// Turn a transaction envelope into a tagged result.
///
/// # Errors
///
/// Returns [`GatewayError::UnexpectedResponse`] when the envelope carries
/// neither key or the transaction payload is unusable.
///
/// # Examples
/// ```
/// use paymentrails::verify_gateway_response;
/// use serde_json::json;
///
/// let envelope = json!({"transaction": {"id": "T-1", "status": "pending"}});
/// let result = verify_gateway_response(envelope.as_object().expect("object"))
///     .expect("recognised envelope");
/// assert!(result.is_success());
/// ```
pub fn verify_gateway_response(
    response: &Map<String, Value>,
) -> Result<GatewayResult<Transaction>, GatewayError> {
    match TransactionEnvelope::classify(response) {
        TransactionEnvelope::Transaction(value) => {
            Ok(GatewayResult::Successful(Transaction::factory(value)?))
        }
        TransactionEnvelope::ApiErrorResponse(value) => {
            Ok(GatewayResult::Error(ApiErrorResponse::from_value(value)))
        }
        TransactionEnvelope::Unrecognised => Err(GatewayError::unexpected_response(
            "expected transaction or apiErrorResponse",
        )),
    }
}
