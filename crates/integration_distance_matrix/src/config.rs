//! Distance matrix client configuration

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use domain::{AccountTier, UnitSystem};
use secrecy::{ExposeSecret, SecretBox, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::DistanceMatrixError;

/// Prefix for environment overrides, e.g. `DISTANCE_MATRIX_API_KEY`
const ENV_PREFIX: &str = "DISTANCE_MATRIX";

/// Configuration for the distance matrix client
///
/// Exactly one authentication scheme must be configured: an `api_key`, or a
/// `client_id` together with a URL-safe base64 `signing_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrixConfig {
    /// Scheme and host of the service, without the API path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language code for the returned addresses and texts
    #[serde(default = "default_language")]
    pub language: String,

    /// Unit system for the human-readable distance texts
    #[serde(default)]
    pub units: UnitSystem,

    /// Account tier, which fixes the per-call element cap
    #[serde(default)]
    pub account_tier: AccountTier,

    /// Maximum length of a fully encoded request URL
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,

    /// Wait applied once the rolling element budget is exhausted, in milliseconds
    #[serde(default = "default_quota_wait_ms")]
    pub quota_wait_ms: u64,

    /// Per-call HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fail the whole request on the first element whose status is not `OK`
    #[serde(default)]
    pub strict_element_status: bool,

    /// API key (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Client id for signed-URL authentication
    #[serde(default)]
    pub client_id: Option<String>,

    /// URL-safe base64 signing key paired with `client_id` (sensitive)
    #[serde(default, skip_serializing)]
    pub signing_key: Option<SecretString>,
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_max_url_length() -> usize {
    2000
}

const fn default_quota_wait_ms() -> u64 {
    10_000
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            units: UnitSystem::default(),
            account_tier: AccountTier::default(),
            max_url_length: default_max_url_length(),
            quota_wait_ms: default_quota_wait_ms(),
            timeout_secs: default_timeout_secs(),
            strict_element_status: false,
            api_key: None,
            client_id: None,
            signing_key: None,
        }
    }
}

/// Authentication material resolved from the configuration
#[derive(Debug)]
pub enum Credentials {
    /// Plain API key sent as the `key` parameter
    ApiKey(SecretString),
    /// Client id plus decoded HMAC key used to sign every URL
    Signed {
        /// Client id sent as the `client` parameter
        client_id: String,
        /// Raw signing key bytes
        key: SecretBox<Vec<u8>>,
    },
}

impl DistanceMatrixConfig {
    /// Create a configuration using an API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Create a configuration using client id and URL signing
    #[must_use]
    pub fn with_client_signature(client_id: impl Into<String>, signing_key: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            signing_key: Some(SecretString::from(signing_key.into())),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            quota_wait_ms: 0,
            timeout_secs: 5,
            ..Self::with_api_key("test-key")
        }
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables take precedence, e.g.
    /// `DISTANCE_MATRIX_API_KEY` or `DISTANCE_MATRIX_ACCOUNT_TIER=for_work`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value fails to deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self, DistanceMatrixError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| DistanceMatrixError::ConfigurationError(e.to_string()))
    }

    /// Per-call element cap derived from the account tier
    #[must_use]
    pub const fn max_elements_per_call(&self) -> usize {
        self.account_tier.max_elements_per_call()
    }

    /// Quota wait as a duration
    #[must_use]
    pub const fn quota_wait(&self) -> Duration {
        Duration::from_millis(self.quota_wait_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.language.trim().is_empty() {
            return Err("language must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_url_length == 0 {
            return Err("max_url_length must be greater than 0".to_string());
        }

        let has_key = self.api_key.is_some();
        let has_signature = self.client_id.is_some() || self.signing_key.is_some();
        match (has_key, has_signature) {
            (true, true) => Err("configure either api_key or client_id/signing_key, not both".to_string()),
            (false, false) => Err("api_key or client_id/signing_key is required".to_string()),
            (false, true) if self.client_id.is_none() || self.signing_key.is_none() => {
                Err("client_id and signing_key must be configured together".to_string())
            },
            _ => Ok(()),
        }
    }

    /// Validate and resolve authentication material
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid or the
    /// signing key is not valid URL-safe base64.
    pub fn credentials(&self) -> Result<Credentials, DistanceMatrixError> {
        self.validate()
            .map_err(DistanceMatrixError::ConfigurationError)?;

        if let Some(api_key) = &self.api_key {
            return Ok(Credentials::ApiKey(api_key.clone()));
        }

        match (&self.client_id, &self.signing_key) {
            (Some(client_id), Some(signing_key)) => {
                let key = URL_SAFE
                    .decode(signing_key.expose_secret().trim())
                    .map_err(|e| {
                        DistanceMatrixError::ConfigurationError(format!(
                            "signing_key is not URL-safe base64: {e}"
                        ))
                    })?;
                Ok(Credentials::Signed {
                    client_id: client_id.clone(),
                    key: SecretBox::new(Box::new(key)),
                })
            },
            _ => Err(DistanceMatrixError::ConfigurationError(
                "client_id and signing_key must be configured together".to_string(),
            )),
        }
    }
}
