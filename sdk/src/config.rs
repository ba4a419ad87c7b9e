//! Validated client configuration.
//!
//! [`Config`] is the runtime view shared by every gateway. It can be built
//! programmatically or loaded through [`crate::settings::ClientSettings`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

const PRODUCTION_BASE: &str = "https://api.paymentrails.com";
const SANDBOX_BASE: &str = "https://api.sandbox.paymentrails.com";
const DEVELOPMENT_BASE: &str = "http://localhost:3000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("paymentrails-rust/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Neither an access token nor a complete key pair was supplied.
    #[error("missing access token or public/private key pair")]
    MissingCredentials,
    /// The environment name is not recognised.
    #[error("unknown environment `{name}`; expected production, sandbox or development")]
    UnknownEnvironment {
        /// Name as supplied.
        name: String,
    },
    /// The API base URL could not be parsed.
    #[error("invalid API base URL `{url}`: {message}")]
    InvalidBaseUrl {
        /// URL as supplied.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient {
        /// Client builder message.
        message: String,
    },
}

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Live API.
    #[default]
    Production,
    /// Sandbox API for integration testing.
    Sandbox,
    /// Local API server.
    Development,
}

impl Environment {
    /// Canonical lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
            Self::Development => "development",
        }
    }

    /// Base URL of the environment's API.
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE,
            Self::Sandbox => SANDBOX_BASE,
            Self::Development => DEVELOPMENT_BASE,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            "development" => Ok(Self::Development),
            _ => Err(ConfigurationError::UnknownEnvironment {
                name: raw.to_owned(),
            }),
        }
    }
}

/// Credentials selected for signing requests.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// Bearer access token.
    AccessToken(&'a str),
    /// Public key and HMAC secret.
    KeyPair {
        /// Public API key.
        public_key: &'a str,
        /// Private key used as the HMAC secret.
        private_key: &'a str,
    },
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken(..)"),
            Self::KeyPair { public_key, .. } => f
                .debug_struct("KeyPair")
                .field("public_key", public_key)
                .finish_non_exhaustive(),
        }
    }
}

/// Runtime configuration shared by gateways.
///
/// # Examples
/// ```
/// use paymentrails::{Config, Environment};
///
/// let config = Config::new(Environment::Sandbox).with_key_pair("pk_test", "sk_test");
/// assert!(config.assert_has_access_token_or_keys().is_ok());
/// assert_eq!(
///     config.base_url().expect("valid url").as_str(),
///     "https://api.sandbox.paymentrails.com/"
/// );
/// ```
#[derive(Clone)]
pub struct Config {
    environment: Environment,
    api_base: Option<Url>,
    access_token: Option<Zeroizing<String>>,
    public_key: Option<String>,
    private_key: Option<Zeroizing<String>>,
    timeout: Duration,
    user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl Config {
    /// Start a configuration for `environment` with no credentials.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            api_base: None,
            access_token: None,
            public_key: None,
            private_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the environment's base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = Some(api_base);
        self
    }

    /// Authenticate with a bearer access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Authenticate by signing requests with a key pair.
    #[must_use]
    pub fn with_key_pair(
        mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.public_key = Some(public_key.into());
        self.private_key = Some(Zeroizing::new(private_key.into()));
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Selected environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Resolved API base URL: the override when set, else the environment's.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidBaseUrl`] if the environment
    /// default fails to parse.
    pub fn base_url(&self) -> Result<Url, ConfigurationError> {
        if let Some(api_base) = &self.api_base {
            return Ok(api_base.clone());
        }
        parse_base_url(self.environment.base_url())
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Credentials used to authenticate requests.
    ///
    /// An access token wins over a key pair. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingCredentials`] when neither is
    /// configured.
    pub fn credentials(&self) -> Result<Credentials<'_>, ConfigurationError> {
        if let Some(token) = non_blank(self.access_token.as_deref().map(String::as_str)) {
            return Ok(Credentials::AccessToken(token));
        }
        let public_key = non_blank(self.public_key.as_deref());
        let private_key = non_blank(self.private_key.as_deref().map(String::as_str));
        match (public_key, private_key) {
            (Some(public_key), Some(private_key)) => Ok(Credentials::KeyPair {
                public_key,
                private_key,
            }),
            _ => Err(ConfigurationError::MissingCredentials),
        }
    }

    /// Fail unless an access token or a complete key pair is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingCredentials`].
    pub fn assert_has_access_token_or_keys(&self) -> Result<(), ConfigurationError> {
        self.credentials().map(|_| ())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("api_base", &self.api_base.as_ref().map(Url::as_str))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Parse a base URL, mapping failures into [`ConfigurationError`].
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ConfigurationError> {
    Url::parse(raw).map_err(|error| ConfigurationError::InvalidBaseUrl {
        url: raw.to_owned(),
        message: error.to_string(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
