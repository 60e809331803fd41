//! Build-info administration: runs, info, creation, promotion, deletion.
//!
//! Build endpoints answer errors with `{"errors": [{status, message}]}`;
//! every HTTP error here is rendered from that body when it parses.

use tracing::{debug, error, instrument};

use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::build::{
    BuildCreateRequest, BuildDeleteRequest, BuildDiffResponse, BuildError, BuildInfo,
    BuildListResponse, BuildPromotionRequest, BuildPromotionResult, BuildProperties, BuildRuns,
};

const BUILDS: &str = "api/build";

/// Manager for build info records.
#[derive(Debug, Clone)]
pub struct ArtifactoryBuild {
    http: HttpClient,
}

impl ArtifactoryBuild {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Runs recorded for build `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404.
    #[instrument(skip(self))]
    pub async fn get_build_runs(&self, name: &str) -> Result<BuildRuns, ArtifactoryError> {
        let runs = self
            .http
            .get(&build_route(name))?
            .fetch_json()
            .await
            .map_err(|e| build_error(e, name))?;
        debug!("build runs retrieved");
        Ok(runs)
    }

    /// Build info of run `number` of build `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404.
    #[instrument(skip(self, properties))]
    pub async fn get_build_info(
        &self,
        name: &str,
        number: &str,
        properties: &BuildProperties,
    ) -> Result<BuildInfo, ArtifactoryError> {
        let info = self
            .http
            .get(&run_route(name, number))?
            .query_pairs(properties.query_pairs())
            .fetch_json()
            .await
            .map_err(|e| build_error(e, &format!("{name}/{number}")))?;
        debug!("build info retrieved");
        Ok(info)
    }

    /// Uploads a new build info record.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::AlreadyExists`] when the run is already
    /// recorded.
    #[instrument(skip(self, request), fields(name = %request.name, number = %request.number))]
    pub async fn create_build(&self, request: &BuildCreateRequest) -> Result<(), ArtifactoryError> {
        let id = format!("{}/{}", request.name, request.number);
        match self
            .get_build_info(&request.name, &request.number, &BuildProperties::default())
            .await
        {
            Ok(_) => {
                error!("build already exists");
                return Err(ArtifactoryError::already_exists(ResourceKind::Build, id));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.http
            .put(BUILDS)?
            .json(request)?
            .send()
            .await
            .map_err(|e| build_error(e, &id))?;
        debug!("build created");
        Ok(())
    }

    /// Promotes run `number` of build `name` between repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the run does not exist.
    #[instrument(skip(self, request), fields(source = %request.source_repo, target = %request.target_repo))]
    pub async fn promote_build(
        &self,
        name: &str,
        number: &str,
        request: &BuildPromotionRequest,
    ) -> Result<BuildPromotionResult, ArtifactoryError> {
        let id = format!("{name}/{number}");
        self.http
            .get(&run_route(name, number))?
            .send()
            .await
            .map_err(|e| build_error(e, &id))?;

        let route = format!(
            "{BUILDS}/promote/{}/{}",
            encode_path(name),
            encode_path(number)
        );
        let result = self
            .http
            .post(&route)?
            .json(request)?
            .fetch_json()
            .await
            .map_err(|e| build_error(e, &id))?;
        debug!("build promoted");
        Ok(result)
    }

    /// Every build name with its latest start time.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<BuildListResponse, ArtifactoryError> {
        let builds = self.http.get(BUILDS)?.fetch_json().await?;
        debug!("builds listed");
        Ok(builds)
    }

    /// Deletes the runs named in `request`, or all runs with `delete_all`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidRequest`] when the request names
    /// nothing to delete and [`ArtifactoryError::NotFound`] when a listed run
    /// does not exist. Nothing is deleted in either case.
    #[instrument(skip(self, request), fields(name = %request.build_name))]
    pub async fn delete(&self, request: &BuildDeleteRequest) -> Result<(), ArtifactoryError> {
        if !request.is_valid() {
            return Err(ArtifactoryError::invalid_request(
                "build delete needs build numbers or deleteAll",
            ));
        }
        if !request.delete_all {
            for number in &request.build_numbers {
                self.http
                    .get(&run_route(&request.build_name, number))?
                    .send()
                    .await
                    .map_err(|e| build_error(e, &format!("{}/{number}", request.build_name)))?;
            }
        }
        self.http
            .post(&format!("{BUILDS}/delete"))?
            .json(request)?
            .send()
            .await
            .map_err(|e| build_error(e, &request.build_name))?;
        if request.delete_all {
            debug!("all builds deleted");
        } else {
            debug!(numbers = %request.build_numbers.join(","), "builds deleted");
        }
        Ok(())
    }

    /// Renames build `name` to `new_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when the build does not exist.
    #[instrument(skip(self))]
    pub async fn rename(&self, name: &str, new_name: &str) -> Result<(), ArtifactoryError> {
        self.http
            .get(&build_route(name))?
            .send()
            .await
            .map_err(|e| build_error(e, name))?;
        self.http
            .post(&format!("{BUILDS}/rename/{}", encode_path(name)))?
            .query("to", new_name)
            .send()
            .await
            .map_err(|e| build_error(e, name))?;
        debug!("build renamed");
        Ok(())
    }

    /// Changes between run `older` and run `number` of build `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404.
    #[instrument(skip(self))]
    pub async fn diff(
        &self,
        name: &str,
        number: &str,
        older: &str,
    ) -> Result<BuildDiffResponse, ArtifactoryError> {
        let diff = self
            .http
            .get(&run_route(name, number))?
            .query("diff", older)
            .fetch_json()
            .await
            .map_err(|e| build_error(e, &format!("{name}/{number}")))?;
        debug!("build diff retrieved");
        Ok(diff)
    }
}

fn build_route(name: &str) -> String {
    format!("{BUILDS}/{}", encode_path(name))
}

fn run_route(name: &str, number: &str) -> String {
    format!("{BUILDS}/{}/{}", encode_path(name), encode_path(number))
}

/// Renders a build error body into the error and maps 404 to `NotFound`.
fn build_error(error: ArtifactoryError, id: &str) -> ArtifactoryError {
    let (method, url, status, body) = match error {
        ArtifactoryError::Http {
            method,
            url,
            status,
            body,
        } => (method, url, status, body),
        other => return other,
    };
    let message = serde_json::from_str::<BuildError>(&body)
        .ok()
        .map(|parsed| parsed.to_error_message())
        .filter(|message| !message.is_empty());

    if status == 404 {
        error!(build = id, message = message.as_deref().unwrap_or(""), "build does not exist");
        return ArtifactoryError::not_found(ResourceKind::Build, id);
    }
    ArtifactoryError::Http {
        method,
        url,
        status,
        body: message.unwrap_or(body),
    }
}
