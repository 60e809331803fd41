//! Streaming download of files and folder trees.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt, TryStreamExt, future, pin_mut};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::{ArtifactoryArtifact, not_found};
use crate::error::ArtifactoryError;
use crate::http::constants::DOWNLOAD_CHUNK_SIZE;
use crate::http::encode_path;
use crate::models::artifact::ArtifactInfo;

impl ArtifactoryArtifact {
    /// Raw content of the file at `path` as a stream of non-empty chunks.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] on 404. Chunks that fail to
    /// arrive surface as [`ArtifactoryError::Network`] items.
    #[instrument(skip(self))]
    pub async fn stream(
        &self,
        path: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, ArtifactoryError>>, ArtifactoryError> {
        let path = path.trim_start_matches('/');
        let response = self
            .http
            .get(&encode_path(path))?
            .send()
            .await
            .map_err(|e| not_found(e, path))?;
        let url = response.url().to_string();
        Ok(response
            .bytes_stream()
            .map_err(move |e| ArtifactoryError::network(url.as_str(), e))
            .try_filter(|chunk| future::ready(!chunk.is_empty()))
            .boxed())
    }

    /// Downloads the file or folder tree at `path` into `destination`.
    ///
    /// The local tree mirrors the remote one relative to the parent of
    /// `path`: downloading `repo/a/b` creates `destination/b/...`. With
    /// `flat`, every file lands directly in `destination` and later files
    /// overwrite earlier ones with the same name.
    ///
    /// Returns `destination/<basename of path>`, or `destination` itself for
    /// a flat folder download.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::NotFound`] when `path` does not exist,
    /// [`ArtifactoryError::Io`] on local filesystem failures and
    /// [`ArtifactoryError::InvalidResponse`] when the server reports a node
    /// outside the requested subtree.
    #[instrument(skip(self, destination), fields(destination = %destination.display()))]
    pub async fn download(
        &self,
        path: &str,
        destination: &Path,
        flat: bool,
    ) -> Result<PathBuf, ArtifactoryError> {
        let path = path.trim_matches('/');
        let basename = path.rsplit('/').next().unwrap_or(path);
        let prefix = path_prefix(path);
        create_dir(destination).await?;

        let mut root_is_folder = None;
        let walk = self.walk(path, true);
        pin_mut!(walk);
        while let Some(node) = walk.try_next().await? {
            root_is_folder.get_or_insert(node.is_folder());
            let full_path = node.full_path();
            let relative = strip_prefix(&full_path, prefix)?;
            let local_path = destination.join(relative);
            match node {
                ArtifactInfo::Folder(_) if flat => {}
                ArtifactInfo::Folder(_) => create_dir(&local_path).await?,
                ArtifactInfo::File(_) => {
                    let directory = if flat {
                        destination
                    } else {
                        local_path.parent().unwrap_or(destination)
                    };
                    self.download_file(&full_path, directory).await?;
                }
            }
        }

        let result = if flat && root_is_folder == Some(true) {
            destination.to_path_buf()
        } else {
            destination.join(basename)
        };
        info!(path = %result.display(), "download complete");
        Ok(result)
    }

    /// Streams one file into `directory`, keeping its remote name.
    async fn download_file(
        &self,
        path: &str,
        directory: &Path,
    ) -> Result<PathBuf, ArtifactoryError> {
        create_dir(directory).await?;
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let file_path = directory.join(file_name);

        let stream = self.stream(path).await?;
        let file = File::create(&file_path)
            .await
            .map_err(|e| ArtifactoryError::io(file_path.clone(), e))?;

        let result = stream_to_file(file, stream, &file_path).await;
        if result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes = result?;
        debug!(path = %file_path.display(), bytes, "artifact downloaded");
        Ok(file_path)
    }
}

/// Writes every chunk to `file`, returning bytes written.
async fn stream_to_file(
    file: File,
    stream: impl Stream<Item = Result<Bytes, ArtifactoryError>>,
    file_path: &Path,
) -> Result<u64, ArtifactoryError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut bytes_written: u64 = 0;
    pin_mut!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ArtifactoryError::io(file_path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| ArtifactoryError::io(file_path, e))?;
    Ok(bytes_written)
}

async fn create_dir(path: &Path) -> Result<(), ArtifactoryError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| ArtifactoryError::io(path, e))
}

/// Parent of `path` with a trailing `/`, or empty for a top-level path.
fn path_prefix(path: &str) -> &str {
    path.rfind('/').map_or("", |index| &path[..=index])
}

/// `full_path` relative to `prefix`. The result never climbs out of the
/// local destination.
fn strip_prefix<'a>(full_path: &'a str, prefix: &str) -> Result<&'a str, ArtifactoryError> {
    let relative = full_path.strip_prefix(prefix).ok_or_else(|| {
        ArtifactoryError::invalid_response(format!(
            "server path {full_path} is outside the requested prefix {prefix}"
        ))
    })?;
    if Path::new(relative)
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::RootDir))
    {
        return Err(ArtifactoryError::invalid_response(format!(
            "server path {full_path} escapes the download destination"
        )));
    }
    Ok(relative)
}
