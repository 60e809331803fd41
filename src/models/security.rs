//! Access token, API key and encrypted password models.

use serde::{Deserialize, Serialize};

use super::SecretString;

fn default_expires_in() -> Option<i64> {
    Some(3600)
}

/// An issued access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: Option<i64>,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

/// Parameters of an access token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenRequest {
    /// Token subject. A transient user is created when it does not exist.
    pub username: String,
    /// Lifetime in seconds; `0` never expires.
    pub expires_in: u64,
    pub refreshable: bool,
    pub scope: String,
}

impl AccessTokenRequest {
    /// One-hour, non-refreshable token scoped to the user's permissions.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            expires_in: 3600,
            refreshable: false,
            scope: "applied-permissions/user".to_string(),
        }
    }
}

/// An API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub api_key: SecretString,
}

/// The requesting user's encrypted password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPassword {
    pub password: SecretString,
}

/// Error body of the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
}
