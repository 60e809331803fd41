//! Connection configuration shared by every resource manager.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ArtifactoryError;

/// Longest whole-request timeout accepted from configuration (one hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Environment variable names read by [`ConnectionConfig::from_env`].
pub mod env_vars {
    pub const URL: &str = "ARTIFACTORY_URL";
    pub const USERNAME: &str = "ARTIFACTORY_USERNAME";
    pub const PASSWORD: &str = "ARTIFACTORY_PASSWORD";
    pub const ACCESS_TOKEN: &str = "ARTIFACTORY_ACCESS_TOKEN";
    pub const TIMEOUT_SECS: &str = "ARTIFACTORY_TIMEOUT_SECS";
    pub const VERIFY_TLS: &str = "ARTIFACTORY_VERIFY_TLS";
    pub const CA_CERT: &str = "ARTIFACTORY_CA_CERT";
    pub const CLIENT_CERT: &str = "ARTIFACTORY_CLIENT_CERT";
    pub const API_VERSION: &str = "ARTIFACTORY_API_VERSION";
}

/// A string whose value never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(**********)")
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// No `Authorization` header.
    #[default]
    Anonymous,
    /// HTTP Basic with a username and a password or API key.
    Basic {
        username: String,
        password: SecretString,
    },
    /// `Authorization: Bearer <token>`.
    Bearer(SecretString),
}

impl Credentials {
    /// Basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token credentials.
    pub fn bearer(token: impl Into<SecretString>) -> Self {
        Self::Bearer(token.into())
    }
}

/// Permission API schema selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// Flat permission targets under `api/security/permissions`.
    #[default]
    V1,
    /// Structured permission targets under `api/v2/security/permissions`.
    V2,
}

impl TryFrom<u8> for ApiVersion {
    type Error = ArtifactoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(ArtifactoryError::config(format!(
                "unsupported API version {other}. Expected 1 or 2"
            ))),
        }
    }
}

/// Everything needed to talk to one Artifactory instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URL, with or without the trailing `/artifactory`.
    pub url: String,
    /// Request authentication.
    pub credentials: Credentials,
    /// Verify server TLS certificates.
    pub verify_tls: bool,
    /// Extra PEM root certificate to trust.
    pub ca_certificate: Option<PathBuf>,
    /// PEM file holding the client certificate and its private key, presented
    /// on every TLS handshake.
    pub client_certificate: Option<PathBuf>,
    /// Whole-request timeout applied to every call. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Permission API schema.
    pub api_version: ApiVersion,
}

impl ConnectionConfig {
    /// Anonymous configuration for `url` with TLS verification on and no timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::Anonymous,
            verify_tls: true,
            ca_certificate: None,
            client_certificate: None,
            timeout: None,
            api_version: ApiVersion::V1,
        }
    }

    /// Sets HTTP Basic credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        self.credentials = Credentials::basic(username, password);
        self
    }

    /// Sets a bearer access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<SecretString>) -> Self {
        self.credentials = Credentials::bearer(token);
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Trusts an additional PEM root certificate.
    #[must_use]
    pub fn with_ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certificate = Some(path.into());
        self
    }

    /// Authenticates with a TLS client certificate (PEM with certificate and key).
    #[must_use]
    pub fn with_client_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_certificate = Some(path.into());
        self
    }

    /// Sets the whole-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Selects the permission API schema.
    #[must_use]
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Validates values that would otherwise fail late at request time.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Config`] for an empty or non-HTTP URL, a
    /// zero or oversized timeout, or empty credentials.
    pub fn validate(&self) -> Result<(), ArtifactoryError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ArtifactoryError::config("`url` must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ArtifactoryError::config(format!(
                "`url` must start with http:// or https://, got {url}"
            )));
        }
        if let Some(timeout) = self
            .timeout
            .filter(|timeout| timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS)
        {
            return Err(ArtifactoryError::config(format!(
                "`timeout` must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {}s",
                timeout.as_secs()
            )));
        }
        match &self.credentials {
            Credentials::Basic { username, .. } if username.is_empty() => {
                Err(ArtifactoryError::config("basic auth username must not be empty"))
            }
            Credentials::Bearer(token) if token.expose().is_empty() => {
                Err(ArtifactoryError::config("access token must not be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Builds a configuration from `ARTIFACTORY_*` environment variables.
    ///
    /// An access token takes precedence over username/password.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Config`] when `ARTIFACTORY_URL` is missing
    /// or any variable holds an unparsable value.
    pub fn from_env() -> Result<Self, ArtifactoryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), with `url` (when given) taking
    /// the place of `ARTIFACTORY_URL`.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_env_with_url(url: Option<&str>) -> Result<Self, ArtifactoryError> {
        Self::from_lookup(|key| match url {
            Some(url) if key == env_vars::URL => Some(url.to_string()),
            _ => env::var(key).ok(),
        })
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArtifactoryError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let url = read(env_vars::URL)
            .ok_or_else(|| ArtifactoryError::config(format!("{} is not set", env_vars::URL)))?;
        let mut config = Self::new(url);

        if let Some(token) = read(env_vars::ACCESS_TOKEN) {
            config.credentials = Credentials::bearer(token);
        } else if let Some(username) = read(env_vars::USERNAME) {
            let password = read(env_vars::PASSWORD).unwrap_or_default();
            config.credentials = Credentials::basic(username, password);
        }

        if let Some(raw) = read(env_vars::TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|_| {
                ArtifactoryError::config(format!(
                    "{} must be a number of seconds, got {raw}",
                    env_vars::TIMEOUT_SECS
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(raw) = read(env_vars::VERIFY_TLS) {
            config.verify_tls = parse_bool(&raw).ok_or_else(|| {
                ArtifactoryError::config(format!(
                    "{} must be true or false, got {raw}",
                    env_vars::VERIFY_TLS
                ))
            })?;
        }

        config.ca_certificate = read(env_vars::CA_CERT).map(PathBuf::from);
        config.client_certificate = read(env_vars::CLIENT_CERT).map(PathBuf::from);

        if let Some(raw) = read(env_vars::API_VERSION) {
            let version = raw.parse::<u8>().map_err(|_| {
                ArtifactoryError::config(format!(
                    "{} must be 1 or 2, got {raw}",
                    env_vars::API_VERSION
                ))
            })?;
            config.api_version = ApiVersion::try_from(version)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
