//! Domain primitives, gateways and the ports they depend on.
//!
//! Purpose: define the typed view of Payment Rails resources and the
//! gateways that fetch them. Value objects keep the API's JSON intact and
//! document their invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Recipient, RecipientId, RecipientAttributes: payee records and writes.
//! - Transaction and [`verify_gateway_response`]: transaction envelopes.
//! - GatewayResult, ApiErrorResponse: success-or-error-payload results.
//! - GatewayError, FailureCategory: failures of gateway operations.
//! - RecipientGateway: the recipients resource gateway.

pub mod error;
pub(crate) mod model;
pub mod ports;
pub mod query;
pub mod recipient;
pub mod recipient_gateway;
pub mod result;
pub mod transaction;

pub(crate) use self::model::json_type_name;

pub use self::error::{FailureCategory, GatewayError};
pub use self::model::{IdentifierError, ModelError};
pub use self::query::{SearchFilter, SearchQuery};
pub use self::recipient::{Recipient, RecipientAttributes, RecipientId, RecipientType};
pub use self::recipient_gateway::{RecipientCollection, RecipientGateway};
pub use self::result::{ApiErrorDetail, ApiErrorResponse, GatewayResult};
pub use self::transaction::{
    Transaction, TransactionEnvelope, TransactionId, verify_gateway_response,
};
