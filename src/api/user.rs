//! User administration.

use tracing::{debug, error, instrument};

use super::classify;
use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::user::{NewUser, SimpleUser, User, UserResponse};

const USERS: &str = "api/security/users";

/// Manager for security users.
#[derive(Debug, Clone)]
pub struct ArtifactoryUser {
    http: HttpClient,
}

impl ArtifactoryUser {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Details of user `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 or 400.
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<UserResponse, ArtifactoryError> {
        let user = self
            .http
            .get(&route(name))?
            .fetch_json()
            .await
            .map_err(|e| {
                classify(e, &[404, 400], || {
                    error!(name, "user does not exist");
                    ArtifactoryError::not_found(ResourceKind::User, name)
                })
            })?;
        debug!("user found");
        Ok(user)
    }

    /// Every user known to the server.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SimpleUser>, ArtifactoryError> {
        let users: Vec<SimpleUser> = self.http.get(USERS)?.fetch_json().await?;
        debug!(count = users.len(), "users listed");
        Ok(users)
    }

    /// Creates `user` and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::AlreadyExists`] when the name is taken.
    #[instrument(skip(self, user), fields(name = %user.name))]
    pub async fn create(&self, user: &NewUser) -> Result<UserResponse, ArtifactoryError> {
        match self.get(&user.name).await {
            Ok(_) => {
                error!("user already exists");
                return Err(ArtifactoryError::already_exists(
                    ResourceKind::User,
                    &user.name,
                ));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.http.put(&route(&user.name))?.json(user)?.send().await?;
        debug!("user created");
        self.get(&user.name).await
    }

    /// Updates an existing user and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the user does not exist.
    #[instrument(skip(self, user), fields(name = %user.name))]
    pub async fn update(&self, user: &User) -> Result<UserResponse, ArtifactoryError> {
        self.get(&user.name).await?;
        self.http.post(&route(&user.name))?.json(user)?.send().await?;
        debug!("user updated");
        self.get(&user.name).await
    }

    /// Deletes user `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the user does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ArtifactoryError> {
        self.get(name).await?;
        self.http.delete(&route(name))?.send().await?;
        debug!("user deleted");
        Ok(())
    }

    /// Unlocks user `name` after too many failed logins. The server accepts
    /// unknown names too.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn unlock(&self, name: &str) -> Result<(), ArtifactoryError> {
        let route = format!("api/security/unlockUsers/{}", encode_path(name));
        self.http.post(&route)?.send().await?;
        debug!("user unlocked");
        Ok(())
    }
}

fn route(name: &str) -> String {
    format!("{USERS}/{}", encode_path(name))
}
