//! Entry point bundling every resource manager over one connection.

use tracing::info;

use crate::api::{
    ArtifactoryAql, ArtifactoryArtifact, ArtifactoryBuild, ArtifactoryGroup,
    ArtifactoryPermission, ArtifactoryRepository, ArtifactorySecurity, ArtifactoryUser,
};
use crate::config::ConnectionConfig;
use crate::error::ArtifactoryError;
use crate::http::HttpClient;

/// A connected Artifactory client.
///
/// All managers share one [`HttpClient`] and therefore one connection pool.
///
/// ```no_run
/// use artifactory_core::{Artifactory, ConnectionConfig};
///
/// # async fn run() -> Result<(), artifactory_core::ArtifactoryError> {
/// let config = ConnectionConfig::new("https://artifactory.example.com")
///     .with_basic_auth("admin", "password");
/// let artifactory = Artifactory::new(&config)?;
/// let info = artifactory.artifacts.info("libs-release-local/app.jar").await?;
/// println!("{}", info.uri());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Artifactory {
    pub users: ArtifactoryUser,
    pub groups: ArtifactoryGroup,
    pub security: ArtifactorySecurity,
    pub repositories: ArtifactoryRepository,
    pub artifacts: ArtifactoryArtifact,
    pub permissions: ArtifactoryPermission,
    pub builds: ArtifactoryBuild,
    pub aql: ArtifactoryAql,
    http: HttpClient,
}

impl Artifactory {
    /// Connects the managers to the server described by `config`.
    ///
    /// No request is sent until a manager is used.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Config`] for an invalid configuration and
    /// [`ArtifactoryError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ArtifactoryError> {
        let http = HttpClient::new(config)?;
        info!(host = %http.host(), api_version = ?config.api_version, "artifactory client created");
        Ok(Self {
            users: ArtifactoryUser::new(http.clone()),
            groups: ArtifactoryGroup::new(http.clone()),
            security: ArtifactorySecurity::new(http.clone()),
            repositories: ArtifactoryRepository::new(http.clone()),
            artifacts: ArtifactoryArtifact::new(http.clone()),
            permissions: ArtifactoryPermission::new(http.clone(), config.api_version),
            builds: ArtifactoryBuild::new(http.clone()),
            aql: ArtifactoryAql::new(http.clone()),
            http,
        })
    }

    /// Connects using the `ARTIFACTORY_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ConnectionConfig::from_env`] and [`new`](Self::new).
    pub fn from_env() -> Result<Self, ArtifactoryError> {
        Self::new(&ConnectionConfig::from_env()?)
    }

    /// Server host URL, without the `/artifactory` suffix.
    #[must_use]
    pub fn host(&self) -> &str {
        self.http.host()
    }
}
