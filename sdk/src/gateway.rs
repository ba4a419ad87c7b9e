//! Entry point tying configuration to resource gateways.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{GatewayError, RecipientGateway};
use crate::outbound::http::ReqwestTransport;

/// Parent gateway holding the shared configuration.
///
/// # Examples
/// ```
/// use paymentrails::{Config, Environment, Gateway};
///
/// let gateway = Gateway::new(Config::new(Environment::Sandbox).with_access_token("token"));
/// let recipients = gateway.recipient().expect("credentials are configured");
/// assert_eq!(recipients.config().environment(), Environment::Sandbox);
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Arc<Config>,
}

impl Gateway {
    /// Wrap a configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Shared configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared configuration handle for gateways built on top of this one.
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Recipients gateway over the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when credentials are missing
    /// or the transport cannot be built.
    pub fn recipient(&self) -> Result<RecipientGateway<ReqwestTransport>, GatewayError> {
        RecipientGateway::new(self)
    }
}

impl From<Config> for Gateway {
    fn from(config: Config) -> Self {
        Self::new(config)
    }
}
