//! Permission target administration, v1 or v2 schema.

use tracing::{debug, error, instrument};

use super::classify;
use crate::config::ApiVersion;
use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::permission::{AnyPermission, Permission, PermissionV2, SimplePermission};

/// Manager for permission targets.
///
/// The API version picked at construction decides both the route prefix and
/// the schema `get` decodes.
#[derive(Debug, Clone)]
pub struct ArtifactoryPermission {
    http: HttpClient,
    api_version: ApiVersion,
}

impl ArtifactoryPermission {
    #[must_use]
    pub fn new(http: HttpClient, api_version: ApiVersion) -> Self {
        Self { http, api_version }
    }

    #[must_use]
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Permission target `name` in the configured schema.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 or 400.
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<AnyPermission, ArtifactoryError> {
        let request = self.http.get(&self.route(name))?;
        let not_found = |e| {
            classify(e, &[404, 400], || {
                error!(name, "permission does not exist");
                ArtifactoryError::not_found(ResourceKind::Permission, name)
            })
        };
        let permission = match self.api_version {
            ApiVersion::V1 => request
                .fetch_json::<Permission>()
                .await
                .map(AnyPermission::V1),
            ApiVersion::V2 => request
                .fetch_json::<PermissionV2>()
                .await
                .map(AnyPermission::V2),
        }
        .map_err(not_found)?;
        debug!("permission found");
        Ok(permission)
    }

    /// Every permission target.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SimplePermission>, ArtifactoryError> {
        let permissions: Vec<SimplePermission> =
            self.http.get(self.prefix())?.fetch_json().await?;
        debug!(count = permissions.len(), "permissions listed");
        Ok(permissions)
    }

    /// Creates `permission` and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidRequest`] when `permission` is not
    /// in the configured schema and [`ArtifactoryError::AlreadyExists`] when
    /// the name is taken.
    #[instrument(skip(self, permission), fields(name = %permission.name()))]
    pub async fn create(&self, permission: &AnyPermission) -> Result<AnyPermission, ArtifactoryError> {
        self.check_schema(permission)?;
        let name = permission.name();
        match self.get(name).await {
            Ok(_) => {
                debug!("permission already exists");
                return Err(ArtifactoryError::already_exists(ResourceKind::Permission, name));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.http.put(&self.route(name))?.json(permission)?.send().await?;
        debug!("permission created");
        self.get(name).await
    }

    /// Replaces an existing permission target and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidRequest`] for a schema mismatch and
    /// [`ArtifactoryError::NotFound`] when the target does not exist.
    #[instrument(skip(self, permission), fields(name = %permission.name()))]
    pub async fn update(&self, permission: &AnyPermission) -> Result<AnyPermission, ArtifactoryError> {
        self.check_schema(permission)?;
        let name = permission.name();
        self.get(name).await?;
        self.http.put(&self.route(name))?.json(permission)?.send().await?;
        debug!("permission updated");
        self.get(name).await
    }

    /// Deletes permission target `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the target does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ArtifactoryError> {
        self.get(name).await?;
        self.http.delete(&self.route(name))?.send().await?;
        debug!("permission deleted");
        Ok(())
    }

    fn prefix(&self) -> &'static str {
        match self.api_version {
            ApiVersion::V1 => "api/security/permissions",
            ApiVersion::V2 => "api/v2/security/permissions",
        }
    }

    fn route(&self, name: &str) -> String {
        format!("{}/{}", self.prefix(), encode_path(name))
    }

    fn check_schema(&self, permission: &AnyPermission) -> Result<(), ArtifactoryError> {
        match (self.api_version, permission) {
            (ApiVersion::V1, AnyPermission::V1(_)) | (ApiVersion::V2, AnyPermission::V2(_)) => {
                Ok(())
            }
            (version, _) => Err(ArtifactoryError::invalid_request(format!(
                "permission {} does not match the {version:?} permission schema",
                permission.name()
            ))),
        }
    }
}
