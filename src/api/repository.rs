//! Repository administration.

use serde_json::Value;
use tracing::{debug, error, instrument};

use super::classify;
use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::repository::{KNOWN_RCLASSES, Repository, SimpleRepository};

const REPOSITORIES: &str = "api/repositories";

/// Manager for local, virtual, remote and federated repositories.
#[derive(Debug, Clone)]
pub struct ArtifactoryRepository {
    http: HttpClient,
}

impl ArtifactoryRepository {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Configuration of repository `key`, decoded into its class.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 or 400,
    /// [`ArtifactoryError::UnknownRepositoryClass`] for an `rclass` this
    /// client does not model and [`ArtifactoryError::Decode`] when the body
    /// does not fit the class.
    #[instrument(skip(self))]
    pub async fn get_repo(&self, key: &str) -> Result<Repository, ArtifactoryError> {
        let request = self.http.get(&route(key))?;
        let url = request.url().to_string();
        let value: Value = request
            .fetch_json()
            .await
            .map_err(|e| not_found(e, key))?;

        let rclass = value.get("rclass").and_then(Value::as_str);
        if let Some(rclass) = rclass.filter(|rclass| !KNOWN_RCLASSES.contains(rclass)) {
            error!(rclass, "unknown repository type found in response");
            return Err(ArtifactoryError::UnknownRepositoryClass {
                rclass: rclass.to_string(),
            });
        }
        let repository: Repository =
            serde_json::from_value(value).map_err(|e| ArtifactoryError::decode(url, e))?;
        debug!(rclass = repository.rclass(), "repository found");
        Ok(repository)
    }

    /// Summary of every repository.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SimpleRepository>, ArtifactoryError> {
        let repositories: Vec<SimpleRepository> =
            self.http.get(REPOSITORIES)?.fetch_json().await?;
        debug!(count = repositories.len(), "repositories listed");
        Ok(repositories)
    }

    /// Creates `repository` and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::AlreadyExists`] when the key is taken.
    #[instrument(skip(self, repository), fields(key = %repository.key()))]
    pub async fn create_repo(&self, repository: &Repository) -> Result<Repository, ArtifactoryError> {
        let key = repository.key();
        match self.get_repo(key).await {
            Ok(_) => {
                error!("repository already exists");
                return Err(ArtifactoryError::already_exists(ResourceKind::Repository, key));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.http.put(&route(key))?.json(repository)?.send().await?;
        debug!("repository created");
        self.get_repo(key).await
    }

    /// Updates an existing repository and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the repository does not
    /// exist.
    #[instrument(skip(self, repository), fields(key = %repository.key()))]
    pub async fn update_repo(&self, repository: &Repository) -> Result<Repository, ArtifactoryError> {
        let key = repository.key();
        self.get_repo(key).await?;
        self.http.post(&route(key))?.json(repository)?.send().await?;
        debug!("repository updated");
        self.get_repo(key).await
    }

    /// Deletes repository `key` and everything stored in it.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 or 400.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<(), ArtifactoryError> {
        self.http
            .delete(&route(key))?
            .send()
            .await
            .map_err(|e| not_found(e, key))?;
        debug!("repository deleted");
        Ok(())
    }
}

fn route(key: &str) -> String {
    format!("{REPOSITORIES}/{}", encode_path(key))
}

fn not_found(error: ArtifactoryError, key: &str) -> ArtifactoryError {
    classify(error, &[404, 400], || {
        error!(key, "repository does not exist");
        ArtifactoryError::not_found(ResourceKind::Repository, key)
    })
}
