//! Group administration.

use tracing::{debug, error, instrument};

use super::classify;
use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::group::{Group, SimpleGroup};

const GROUPS: &str = "api/security/groups";

/// Manager for security groups.
#[derive(Debug, Clone)]
pub struct ArtifactoryGroup {
    http: HttpClient,
}

impl ArtifactoryGroup {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Details of group `name`, including its member names.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 or 400.
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Group, ArtifactoryError> {
        let group = self
            .http
            .get(&route(name))?
            .query("includeUsers", "true")
            .fetch_json()
            .await
            .map_err(|e| {
                classify(e, &[404, 400], || {
                    error!(name, "group does not exist");
                    ArtifactoryError::not_found(ResourceKind::Group, name)
                })
            })?;
        debug!("group found");
        Ok(group)
    }

    /// Every group known to the server.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SimpleGroup>, ArtifactoryError> {
        let groups: Vec<SimpleGroup> = self.http.get(GROUPS)?.fetch_json().await?;
        debug!(count = groups.len(), "groups listed");
        Ok(groups)
    }

    /// Creates `group` and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::AlreadyExists`] when the name is taken.
    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn create(&self, group: &Group) -> Result<Group, ArtifactoryError> {
        match self.get(&group.name).await {
            Ok(_) => {
                error!("group already exists");
                return Err(ArtifactoryError::already_exists(
                    ResourceKind::Group,
                    &group.name,
                ));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.http.put(&route(&group.name))?.json(group)?.send().await?;
        debug!("group created");
        self.get(&group.name).await
    }

    /// Updates an existing group and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the group does not exist.
    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn update(&self, group: &Group) -> Result<Group, ArtifactoryError> {
        self.get(&group.name).await?;
        self.http.post(&route(&group.name))?.json(group)?.send().await?;
        debug!("group updated");
        self.get(&group.name).await
    }

    /// Deletes group `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the group does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ArtifactoryError> {
        self.get(name).await?;
        self.http.delete(&route(name))?.send().await?;
        debug!("group deleted");
        Ok(())
    }
}

fn route(name: &str) -> String {
    format!("{GROUPS}/{}", encode_path(name))
}
