//! Artifact operations: info, properties, listing, copy/move and delete.
//!
//! Tree operations live in submodules: [`walk`](ArtifactoryArtifact::walk)
//! in `walk.rs`, [`download`](ArtifactoryArtifact::download) and
//! [`stream`](ArtifactoryArtifact::stream) in `download.rs`,
//! [`deploy`](ArtifactoryArtifact::deploy) in `deploy.rs`.

mod deploy;
mod download;
mod walk;

use serde_json::json;
use tracing::{debug, error, instrument};

use super::classify;
use crate::error::{ArtifactoryError, ResourceKind};
use crate::http::{HttpClient, encode_path};
use crate::models::artifact::{
    ArtifactInfo, ArtifactList, ArtifactStats, ListOptions, Properties, PropertiesResponse,
};

/// Manager for files and folders stored in repositories.
#[derive(Debug, Clone)]
pub struct ArtifactoryArtifact {
    http: HttpClient,
}

impl ArtifactoryArtifact {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Folder or file information for `path` (`<repo>/<path inside repo>`).
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 and
    /// [`ArtifactoryError::Decode`] when the body is neither a folder nor a
    /// file.
    #[instrument(skip(self))]
    pub async fn info(&self, path: &str) -> Result<ArtifactInfo, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/storage/{}", encode_path(path));
        self.http
            .get(&route)?
            .fetch_json()
            .await
            .map_err(|e| not_found(e, path))
    }

    /// Properties of `path`, restricted to `names` (all when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::PropertyNotFound`] on 404, which the server
    /// answers when none of the requested properties exist.
    #[instrument(skip(self))]
    pub async fn properties(
        &self,
        path: &str,
        names: &[&str],
    ) -> Result<PropertiesResponse, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/storage/{}", encode_path(path));
        let properties = self
            .http
            .get(&route)?
            .query("properties", &names.join(","))
            .fetch_json()
            .await
            .map_err(|e| {
                classify(e, &[404], || ArtifactoryError::property_not_found(path, names))
            })?;
        debug!("artifact properties retrieved");
        Ok(properties)
    }

    /// Sets `properties` on `path` and returns the properties now stored.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404 and
    /// [`ArtifactoryError::BadProperties`] on 400 (forbidden characters).
    #[instrument(skip(self, properties))]
    pub async fn set_properties(
        &self,
        path: &str,
        properties: &Properties,
        recursive: bool,
    ) -> Result<PropertiesResponse, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/storage/{}", encode_path(path));
        self.http
            .put(&route)?
            .query("recursive", flag(recursive))
            .query("properties", &format_properties(properties))
            .send()
            .await
            .map_err(|e| {
                if e.has_status(&[400]) {
                    error!(path, "a property value includes forbidden special characters");
                    return ArtifactoryError::bad_properties(path);
                }
                not_found(e, path)
            })?;
        debug!("artifact properties set");
        self.properties(path, &[]).await
    }

    /// Merges `properties` into the metadata of `path` and returns the
    /// properties now stored. An empty value list removes the property.
    ///
    /// # Errors
    ///
    /// Any HTTP error, including a 400 validation failure, is returned as
    /// [`ArtifactoryError::Http`].
    #[instrument(skip(self, properties))]
    pub async fn update_properties(
        &self,
        path: &str,
        properties: &Properties,
        recursive: bool,
    ) -> Result<PropertiesResponse, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/metadata/{}", encode_path(path));
        self.http
            .patch(&route)?
            .query("recursiveProperties", flag(recursive))
            .json(&json!({ "props": properties }))?
            .send()
            .await
            .inspect_err(|e| error!(path, error = %e, "error updating artifact properties"))?;
        debug!("artifact properties updated");
        self.properties(path, &[]).await
    }

    /// Flat listing of the files (and optionally folders) under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        path: &str,
        options: &ListOptions,
    ) -> Result<ArtifactList, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/storage/{}?list", encode_path(path));
        let mut request = self
            .http
            .get(&route)?
            .query("deep", flag(options.recursive))
            .query("listFolders", flag(options.list_folders));
        if let Some(depth) = options.depth {
            request = request.query("depth", &depth.to_string());
        }
        request.fetch_json().await.map_err(|e| not_found(e, path))
    }

    /// Download statistics of `path`.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn stats(&self, path: &str) -> Result<ArtifactStats, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let route = format!("api/storage/{}?stats", encode_path(path));
        let stats = self.http.get(&route)?.fetch_json().await?;
        debug!("artifact stats retrieved");
        Ok(stats)
    }

    /// Copies `from` to `to` and returns the info of the destination.
    ///
    /// With `dry_run` the server only validates the copy; the destination is
    /// still looked up afterwards.
    ///
    /// # Errors
    ///
    /// Any HTTP error of the copy is returned as [`ArtifactoryError::Http`];
    /// the final lookup fails with [`ArtifactoryError::NotFound`] when the
    /// destination does not exist.
    #[instrument(skip(self))]
    pub async fn copy(
        &self,
        from: &str,
        to: &str,
        dry_run: bool,
    ) -> Result<ArtifactInfo, ArtifactoryError> {
        self.relocate("copy", from, to, dry_run).await
    }

    /// Moves `from` to `to` and returns the info of the destination.
    ///
    /// # Errors
    ///
    /// Same as [`copy`](Self::copy).
    #[instrument(skip(self))]
    pub async fn move_to(
        &self,
        from: &str,
        to: &str,
        dry_run: bool,
    ) -> Result<ArtifactInfo, ArtifactoryError> {
        self.relocate("move", from, to, dry_run).await
    }

    async fn relocate(
        &self,
        operation: &str,
        from: &str,
        to: &str,
        dry_run: bool,
    ) -> Result<ArtifactInfo, ArtifactoryError> {
        let from = from.trim_start_matches('/');
        let to = to.trim_start_matches('/');
        let route = format!(
            "api/{operation}/{}?to={}&dry={}",
            encode_path(from),
            encode_path(to),
            flag(dry_run)
        );
        self.http.post(&route)?.send().await?;
        debug!(from, to, operation, "artifact relocated");
        self.info(to).await
    }

    /// Deletes a file or a folder with everything under it.
    ///
    /// # Errors
    ///
    /// Any HTTP error is returned as [`ArtifactoryError::Http`].
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), ArtifactoryError> {
        let path = path.trim_start_matches('/');
        self.http.delete(&encode_path(path))?.send().await?;
        debug!("artifact deleted");
        Ok(())
    }
}

/// `k=v1,v2;k2=v3`, in key order.
#[must_use]
pub fn format_properties(properties: &Properties) -> String {
    properties
        .iter()
        .map(|(key, values)| format!("{key}={}", values.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn not_found(error: ArtifactoryError, path: &str) -> ArtifactoryError {
    classify(error, &[404], || {
        error!(path, "artifact does not exist");
        ArtifactoryError::not_found(ResourceKind::Artifact, path)
    })
}
