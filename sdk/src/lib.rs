//! Client SDK for the Payment Rails REST API.
//!
//! Build a [`Config`], wrap it in a [`Gateway`], and ask it for resource
//! gateways:
//!
//! ```no_run
//! use paymentrails::{Config, Environment, Gateway, SearchQuery};
//!
//! # async fn run() -> Result<(), paymentrails::GatewayError> {
//! let gateway = Gateway::new(
//!     Config::new(Environment::Sandbox).with_key_pair("pk_test", "sk_test"),
//! );
//! let recipients = gateway.recipient()?;
//! let page = recipients.search(SearchQuery::basic("tom")).await?;
//! for recipient in &page {
//!     println!("{:?} {:?}", recipient.id(), recipient.email());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod gateway;
pub mod outbound;
pub mod settings;

pub use config::{Config, ConfigurationError, Credentials, Environment};
pub use domain::{
    ApiErrorDetail, ApiErrorResponse, FailureCategory, GatewayError, GatewayResult,
    IdentifierError, ModelError, Recipient, RecipientAttributes, RecipientCollection,
    RecipientGateway, RecipientId, RecipientType, SearchFilter, SearchQuery, Transaction,
    TransactionEnvelope, TransactionId, verify_gateway_response,
};
pub use domain::ports::{ApiResponse, HttpTransport, TransportError};
pub use gateway::Gateway;
pub use outbound::http::ReqwestTransport;
pub use pagination::{PageMeta, ResourceCollection};
pub use settings::ClientSettings;

/// Earlier name of [`RecipientGateway`], kept for existing callers.
pub type PaymentGateway<T = ReqwestTransport> = RecipientGateway<T>;
