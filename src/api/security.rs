//! Access tokens, API keys and the encrypted password.

use tracing::{debug, error, instrument};

use crate::error::ArtifactoryError;
use crate::http::{HttpClient, encode_path, read_json};
use crate::models::security::{
    AccessToken, AccessTokenRequest, ApiKey, EncryptedPassword, TokenErrorBody,
};

const API_KEY: &str = "api/security/apiKey";
const TOKENS: &str = "access/api/v1/tokens";

/// Manager for credentials of the requesting user.
#[derive(Debug, Clone)]
pub struct ArtifactorySecurity {
    http: HttpClient,
}

impl ArtifactorySecurity {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Encrypted form of the requesting user's password.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn get_encrypted_password(&self) -> Result<EncryptedPassword, ArtifactoryError> {
        let password = self
            .http
            .get("api/security/encryptedPassword")?
            .fetch_json()
            .await?;
        debug!("encrypted password delivered");
        Ok(password)
    }

    /// Issues an access token.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidTokenData`] for an empty user name
    /// or when the server refuses the request, carrying its
    /// `error_description`.
    #[instrument(skip(self, request), fields(username = %request.username, scope = %request.scope))]
    pub async fn create_access_token(
        &self,
        request: &AccessTokenRequest,
    ) -> Result<AccessToken, ArtifactoryError> {
        if request.username.trim().is_empty() {
            return Err(ArtifactoryError::invalid_token_data(
                "a user name is required to create an access token",
            ));
        }
        let expires_in = request.expires_in.to_string();
        let response = self
            .http
            .post(TOKENS)?
            .form([
                ("username", request.username.as_str()),
                ("expires_in", expires_in.as_str()),
                ("refreshable", if request.refreshable { "true" } else { "false" }),
                ("scope", request.scope.as_str()),
            ])
            .send_unchecked()
            .await?;

        if response.status().is_success() {
            let token = read_json(response).await?;
            debug!("access token created");
            return Ok(token);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<TokenErrorBody>(&body)
            .ok()
            .and_then(|body| body.error_description)
            .unwrap_or_else(|| "Unknown error".to_string());
        error!(status, message = %message, "access token request refused");
        Err(ArtifactoryError::invalid_token_data(message))
    }

    /// Revokes `token`. Returns false when the server refuses; a token that
    /// does not exist counts as revoked.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidTokenData`] for an empty token and
    /// transport errors as usual.
    #[instrument(skip(self, token))]
    pub async fn revoke_access_token(&self, token: &str) -> Result<bool, ArtifactoryError> {
        if token.trim().is_empty() {
            return Err(ArtifactoryError::invalid_token_data(
                "a token is required to revoke it",
            ));
        }
        let response = self
            .http
            .delete(&format!("{TOKENS}/revoke"))?
            .form([("token", token)])
            .send_unchecked()
            .await?;

        if response.status().is_success() {
            debug!("token revoked, or token did not exist");
            return Ok(true);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        error!(status, body = %body, "token revocation unsuccessful");
        Ok(false)
    }

    /// Creates an API key for the requesting user. Fails when one exists;
    /// use [`regenerate_api_key`](Self::regenerate_api_key) then.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn create_api_key(&self) -> Result<ApiKey, ArtifactoryError> {
        let key = self.http.post(API_KEY)?.fetch_json().await?;
        debug!("API key created");
        Ok(key)
    }

    /// Replaces the requesting user's API key.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn regenerate_api_key(&self) -> Result<ApiKey, ArtifactoryError> {
        let key = self.http.put(API_KEY)?.fetch_json().await?;
        debug!("API key regenerated");
        Ok(key)
    }

    /// The requesting user's API key.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn get_api_key(&self) -> Result<ApiKey, ArtifactoryError> {
        let key = self.http.get(API_KEY)?.fetch_json().await?;
        debug!("API key delivered");
        Ok(key)
    }

    /// Revokes the requesting user's API key.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn revoke_api_key(&self) -> Result<(), ArtifactoryError> {
        self.http.delete(API_KEY)?.send().await?;
        debug!("API key revoked");
        Ok(())
    }

    /// Revokes the API key of user `name`.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn revoke_user_api_key(&self, name: &str) -> Result<(), ArtifactoryError> {
        self.http
            .delete(&format!("{API_KEY}/{}", encode_path(name)))?
            .send()
            .await?;
        debug!("user API key revoked");
        Ok(())
    }
}
