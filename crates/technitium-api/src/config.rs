// Runtime connection configuration
//
// These types describe how to reach a Technitium DNS server. They load
// from TOML files and TECHNITIUM_-prefixed environment variables via
// figment, with the environment taking precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig};

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

/// Connection settings for a Technitium DNS server.
///
/// Authentication is either a pre-issued API token or a username/password
/// pair; [`ClientConfig::validate`] enforces that at least one is present.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the DNS server, e.g. `http://localhost:5380`.
    pub base_url: Url,
    /// Username for session login.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for session login.
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Pre-issued API token. Takes precedence over session login.
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per API call, the first try included.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Skip TLS certificate verification. Local testing only.
    #[serde(default)]
    pub insecure_skip_verify: bool,
    /// Custom CA bundle (PEM) for TLS verification.
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            username: None,
            password: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            insecure_skip_verify: false,
            ca_file: None,
        }
    }

    /// Load configuration from `TECHNITIUM_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Figment::new()
            .merge(Env::prefixed("TECHNITIUM_"))
            .extract()
            .map_err(|e| Error::Config { message: e.to_string() })
    }

    /// Load configuration from a TOML file, with environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("TECHNITIUM_"))
            .extract()
            .map_err(|e| Error::Config { message: e.to_string() })
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// True when a non-empty API token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// True when both username and password are configured and non-empty.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
            && self
                .password
                .as_ref()
                .is_some_and(|p| !p.expose_secret().is_empty())
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.has_token() && !self.has_credentials() {
            return Err(Error::Config {
                message: "either token or username and password must be provided".to_owned(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure_skip_verify {
            TlsMode::DangerAcceptInvalid
        } else if let Some(path) = &self.ca_file {
            TlsMode::CustomCa(path.clone())
        } else {
            TlsMode::System
        };
        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        }
    }
}
