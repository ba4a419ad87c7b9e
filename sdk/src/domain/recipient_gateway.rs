//! Gateway for the `/v1/recipients` resource.
//!
//! Each operation is one round trip through the [`HttpTransport`] port.
//! A response whose envelope is not ok becomes
//! [`GatewayError::ServiceUnavailable`] before any model is built.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageSource, Pager, ResourceCollection};
use serde_json::Value;
use tracing::warn;

use super::error::{FailureCategory, GatewayError};
use super::ports::{ApiResponse, HttpTransport};
use super::query::SearchQuery;
use super::recipient::{Recipient, RecipientAttributes, RecipientId};
use super::result::ApiErrorResponse;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::outbound::http::ReqwestTransport;

const RECIPIENTS_PATH: &str = "/v1/recipients";
const RECIPIENT_KEY: &str = "recipient";
const RECIPIENTS_KEY: &str = "recipients";
const SEARCH_METHOD: &str = "search";

/// One page of recipients from [`RecipientGateway::search`].
pub type RecipientCollection<'g, T = ReqwestTransport> = ResourceCollection<'g, RecipientGateway<T>>;

/// Gateway performing recipient operations.
///
/// ## Invariants
/// - Construction succeeds only when the configuration carries an access
///   token or a complete key pair.
pub struct RecipientGateway<T = ReqwestTransport> {
    config: Arc<Config>,
    http: Arc<T>,
}

impl<T> fmt::Debug for RecipientGateway<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipientGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecipientGateway<ReqwestTransport> {
    /// Build a gateway over the reqwest transport from a parent gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when credentials are missing
    /// or the transport cannot be built. No request is sent.
    pub fn new(gateway: &Gateway) -> Result<Self, GatewayError> {
        let config = gateway.shared_config();
        config.assert_has_access_token_or_keys()?;
        let http = ReqwestTransport::new(Arc::clone(&config))?;
        Ok(Self {
            config,
            http: Arc::new(http),
        })
    }
}

impl<T: HttpTransport> RecipientGateway<T> {
    /// Build a gateway over an explicit transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when credentials are missing.
    pub fn with_transport(config: Arc<Config>, http: Arc<T>) -> Result<Self, GatewayError> {
        config.assert_has_access_token_or_keys()?;
        Ok(Self { config, http })
    }

    /// Configuration the gateway was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search recipients with a basic term or advanced filters.
    ///
    /// Items keep the order of the `recipients` array. The returned page can
    /// replay the query or fetch the page after it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] for a non-ok response and
    /// [`GatewayError::UnexpectedResponse`] when `recipients` is missing or
    /// an item is not a JSON object.
    pub async fn search(
        &self,
        query: impl Into<SearchQuery>,
    ) -> Result<RecipientCollection<'_, T>, GatewayError> {
        self.search_page(query.into()).await
    }

    /// Fetch one recipient.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] for a non-ok response,
    /// including an unknown id.
    pub async fn find(&self, id: &RecipientId) -> Result<Recipient, GatewayError> {
        let response = self.http.get(&recipient_path(id), &[]).await?;
        recipient_from(ensure_ok("find", response)?)
    }

    /// Create a recipient from an attribute map.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] when the API rejects the
    /// attributes.
    pub async fn create(&self, attributes: &RecipientAttributes) -> Result<Recipient, GatewayError> {
        let response = self
            .http
            .post(RECIPIENTS_PATH, &attributes.to_value())
            .await?;
        recipient_from(ensure_ok("create", response)?)
    }

    /// Update a recipient with a partial attribute map.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] when the API rejects the
    /// update.
    pub async fn update(
        &self,
        id: &RecipientId,
        attributes: &RecipientAttributes,
    ) -> Result<Recipient, GatewayError> {
        let response = self
            .http
            .patch(&recipient_path(id), &attributes.to_value())
            .await?;
        recipient_from(ensure_ok("update", response)?)
    }

    /// Delete a recipient. Returns `true` once the API confirms.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] for a non-ok response.
    pub async fn delete(&self, id: &RecipientId) -> Result<bool, GatewayError> {
        let response = self.http.delete(&recipient_path(id)).await?;
        ensure_ok("delete", response)?;
        Ok(true)
    }

    async fn search_page(
        &self,
        query: SearchQuery,
    ) -> Result<RecipientCollection<'_, T>, GatewayError> {
        let response = self
            .http
            .get(RECIPIENTS_PATH, &query.to_query_pairs())
            .await?;
        let response = ensure_ok(SEARCH_METHOD, response)?;
        let items = match response.get(RECIPIENTS_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .cloned()
                .map(Recipient::factory)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(GatewayError::unexpected_response(
                    "`recipients` must be an array",
                ));
            }
            None => {
                return Err(GatewayError::unexpected_response(
                    "search response is missing `recipients`",
                ));
            }
        };
        let pager = Pager::new(self, SEARCH_METHOD, query);
        ResourceCollection::try_new(response.body, items, pager)
            .map_err(|error| GatewayError::unexpected_response(error.to_string()))
    }
}

#[async_trait]
impl<T: HttpTransport> PageSource for RecipientGateway<T> {
    type Query = SearchQuery;
    type Item = Recipient;
    type Error = GatewayError;

    async fn fetch_page(
        &self,
        method: &'static str,
        query: SearchQuery,
    ) -> Result<ResourceCollection<'_, Self>, GatewayError> {
        match method {
            SEARCH_METHOD => self.search_page(query).await,
            other => Err(GatewayError::unexpected_response(format!(
                "recipients cannot page with `{other}`"
            ))),
        }
    }
}

fn recipient_path(id: &RecipientId) -> String {
    format!("{RECIPIENTS_PATH}/{}", urlencoding::encode(id.as_str()))
}

fn ensure_ok(operation: &'static str, response: ApiResponse) -> Result<ApiResponse, GatewayError> {
    if response.is_ok() {
        return Ok(response);
    }
    let status = response.status;
    let payload = ApiErrorResponse::from_value(Value::Object(response.body));
    warn!(
        operation,
        status,
        category = %FailureCategory::from_status(status),
        detail = payload.first_message().unwrap_or_default(),
        "payment rails request failed"
    );
    Err(GatewayError::service_unavailable(status, &payload))
}

fn recipient_from(mut response: ApiResponse) -> Result<Recipient, GatewayError> {
    let value = response.take(RECIPIENT_KEY).ok_or_else(|| {
        GatewayError::unexpected_response("response is missing `recipient`")
    })?;
    Ok(Recipient::factory(value)?)
}

#[cfg(test)]
#[path = "recipient_gateway_tests.rs"]
mod tests;
