//! Checksums of local files, sent as `X-Checksum-*` headers on deploy.

use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::error::ArtifactoryError;
use crate::http::constants::CHECKSUM_BLOCK_SIZE;
use crate::models::artifact::Checksums;

impl Checksums {
    /// Hashes `path` in fixed-size blocks, feeding all three digests at once.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Io`] when the file cannot be opened or read.
    pub async fn generate(path: &Path) -> Result<Self, ArtifactoryError> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ArtifactoryError::io(path, e))?;

        let mut sha1 = Sha1::new();
        let mut sha256 = Sha256::new();
        let mut md5 = Md5::new();
        let mut block = vec![0_u8; CHECKSUM_BLOCK_SIZE];
        loop {
            let read = file
                .read(&mut block)
                .await
                .map_err(|e| ArtifactoryError::io(path, e))?;
            if read == 0 {
                break;
            }
            let data = &block[..read];
            sha1.update(data);
            sha256.update(data);
            md5.update(data);
        }

        Ok(Self {
            sha1: hex::encode(sha1.finalize()),
            sha256: hex::encode(sha256.finalize()),
            md5: hex::encode(md5.finalize()),
        })
    }

    /// Header name/value pairs in the form the deploy endpoint expects.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            ("X-Checksum-Sha1", self.sha1.as_str()),
            ("X-Checksum-Sha256", self.sha256.as_str()),
            ("X-Checksum", self.md5.as_str()),
        ]
    }
}
