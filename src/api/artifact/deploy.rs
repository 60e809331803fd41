//! Upload of single files and local directory trees.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tracing::{debug, error, info, instrument};

use super::{ArtifactoryArtifact, format_properties, not_found};
use crate::api::classify;
use crate::error::ArtifactoryError;
use crate::http::encode_path;
use crate::models::artifact::{ArtifactInfo, Checksums, Properties};

impl ArtifactoryArtifact {
    /// Uploads the file or directory tree at `local` to `artifact_path`.
    ///
    /// A directory is uploaded file by file, each one to
    /// `artifact_path/<path relative to local>`. `properties` are attached to
    /// every uploaded file as matrix parameters. With `checksum_enabled` the
    /// server is asked to create each file from content it already holds with
    /// the same checksums, and no body is sent.
    ///
    /// Returns the info of `artifact_path` once every file is uploaded.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::BadProperties`] when the server rejects the
    /// properties, [`ArtifactoryError::NotFound`] when a checksum deploy finds
    /// no matching content and [`ArtifactoryError::Io`] on local read failures.
    #[instrument(skip(self, local, properties), fields(local = %local.display()))]
    pub async fn deploy(
        &self,
        local: &Path,
        artifact_path: &str,
        properties: Option<&Properties>,
        checksum_enabled: bool,
    ) -> Result<ArtifactInfo, ArtifactoryError> {
        let artifact_path = artifact_path.trim_matches('/');
        let metadata = tokio::fs::metadata(local)
            .await
            .map_err(|e| ArtifactoryError::io(local, e))?;

        if metadata.is_dir() {
            let files = collect_files(local).await?;
            info!(files = files.len(), "deploying directory");
            for relative in files {
                let remote = format!("{artifact_path}/{}", to_remote(&relative));
                self.deploy_file(&local.join(&relative), &remote, properties, checksum_enabled)
                    .await?;
            }
        } else {
            self.deploy_file(local, artifact_path, properties, checksum_enabled)
                .await?;
        }
        self.info(artifact_path).await
    }

    async fn deploy_file(
        &self,
        local: &Path,
        artifact_path: &str,
        properties: Option<&Properties>,
        checksum_enabled: bool,
    ) -> Result<(), ArtifactoryError> {
        let mut route = encode_path(artifact_path);
        if let Some(properties) = properties.filter(|p| !p.is_empty()) {
            route.push(';');
            route.push_str(&format_properties(properties));
        }

        let checksums = Checksums::generate(local).await?;
        let mut request = self.http.put(&route)?;
        for (name, value) in checksums.headers() {
            request = request.header(name, value);
        }

        let result = if checksum_enabled {
            request
                .header("X-Checksum-Deploy", "true")
                .send()
                .await
                .map_err(|e| not_found(e, artifact_path))
        } else {
            let file = File::open(local)
                .await
                .map_err(|e| ArtifactoryError::io(local, e))?;
            request
                .header("X-Checksum-Deploy", "false")
                .body(file)
                .send()
                .await
        };
        result.map_err(|e| {
            if properties.is_none() {
                return e;
            }
            classify(e, &[400], || {
                error!(path = artifact_path, "a property value includes forbidden special characters");
                ArtifactoryError::bad_properties(artifact_path)
            })
        })?;
        debug!(local = %local.display(), path = artifact_path, "artifact deployed");
        Ok(())
    }
}

/// Regular files under `root`, relative to it, in depth-first order with
/// entries of each directory sorted by name.
async fn collect_files(root: &Path) -> Result<Vec<PathBuf>, ArtifactoryError> {
    let mut files = Vec::new();
    let mut pending = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        let directory = root.join(&relative);
        let mut entries = tokio::fs::read_dir(&directory)
            .await
            .map_err(|e| ArtifactoryError::io(&directory, e))?;
        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArtifactoryError::io(&directory, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ArtifactoryError::io(&path, e))?;
            if file_type.is_symlink() {
                // Linked directories are not descended into; linked files are uploaded.
                let target_is_dir = tokio::fs::metadata(&path)
                    .await
                    .is_ok_and(|metadata| metadata.is_dir());
                if target_is_dir {
                    debug!(path = %path.display(), "skipping symlinked directory");
                    continue;
                }
            }
            children.push((relative.join(entry.file_name()), file_type.is_dir()));
        }
        children.sort();

        let mut subdirectories = Vec::new();
        for (child, is_dir) in children {
            if is_dir {
                subdirectories.push(child);
            } else {
                files.push(child);
            }
        }
        pending.extend(subdirectories.into_iter().rev());
    }
    Ok(files)
}

/// `/`-joined form of a relative local path.
fn to_remote(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
