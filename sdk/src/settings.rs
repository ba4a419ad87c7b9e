//! Client settings loaded via OrthoConfig.
//!
//! Values come from `PAYMENTRAILS_*` environment variables or a config file
//! and are validated into a [`Config`] by [`ClientSettings::into_config`].

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::config::{Config, ConfigurationError, Environment, parse_base_url};

/// Raw connection settings for the Payment Rails API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAYMENTRAILS")]
pub struct ClientSettings {
    /// Target environment: production, sandbox or development.
    pub environment: Option<String>,
    /// Base URL override; takes precedence over the environment.
    pub api_base: Option<String>,
    /// Bearer access token.
    pub access_token: Option<String>,
    /// Public API key for signed requests.
    pub public_key: Option<String>,
    /// Private API key for signed requests.
    pub private_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// `User-Agent` header override.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Validate the raw values into a [`Config`].
    ///
    /// Credentials are not checked here; gateways assert them on
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for an unknown environment or an
    /// unparsable base URL.
    pub fn into_config(self) -> Result<Config, ConfigurationError> {
        let environment = match self.environment.as_deref() {
            Some(name) => name.parse::<Environment>()?,
            None => Environment::default(),
        };
        let mut config = Config::new(environment);
        if let Some(api_base) = self.api_base.as_deref() {
            config = config.with_api_base(parse_base_url(api_base)?);
        }
        if let Some(token) = self.access_token {
            config = config.with_access_token(token);
        }
        if self.public_key.is_some() || self.private_key.is_some() {
            config = config.with_key_pair(
                self.public_key.unwrap_or_default(),
                self.private_key.unwrap_or_default(),
            );
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(seconds.max(1)));
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        Ok(config)
    }
}
