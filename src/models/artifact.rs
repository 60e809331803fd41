//! Artifact (file and folder) models.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Property name to ordered values. Duplicate values are allowed.
pub type Properties = BTreeMap<String, Vec<String>>;

/// Digests the server reports for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub sha1: String,
    pub md5: String,
    pub sha256: String,
}

/// Digests of the file as originally uploaded. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalChecksums {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Entry of a folder's `children` list. `uri` is relative to the folder and
/// starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub uri: String,
    #[serde(deserialize_with = "lenient::bool")]
    pub folder: bool,
}

/// Fields shared by file and folder info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfoBase {
    pub repo: String,
    /// Repository-relative path, starting with `/`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub uri: String,
}

/// Folder info. Only folders carry `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    #[serde(flatten)]
    pub base: ArtifactInfoBase,
    pub children: Vec<Child>,
}

/// File info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(flatten)]
    pub base: ArtifactInfoBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksums: Option<Checksums>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_checksums: Option<OriginalChecksums>,
}

/// Result of a storage info call: a folder or a file.
///
/// The wire format has no discriminator. A body that decodes as a folder
/// (it has `children`) is a folder; anything else must decode as a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArtifactInfo {
    Folder(FolderInfo),
    File(FileInfo),
}

impl ArtifactInfo {
    /// Shared fields.
    #[must_use]
    pub fn base(&self) -> &ArtifactInfoBase {
        match self {
            Self::Folder(folder) => &folder.base,
            Self::File(file) => &file.base,
        }
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.base().repo
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.base().path
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.base().uri
    }

    /// `repo` followed by `path`, e.g. `libs-local/org/app.jar`.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}{}", self.repo(), self.path())
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

impl<'de> Deserialize<'de> for ArtifactInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let folder_error = match FolderInfo::deserialize(&value) {
            Ok(folder) => return Ok(Self::Folder(folder)),
            Err(error) => error,
        };
        FileInfo::deserialize(&value).map(Self::File).map_err(|file_error| {
            de::Error::custom(format!(
                "neither folder info ({folder_error}) nor file info ({file_error})"
            ))
        })
    }
}

/// Answer of a properties query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub uri: String,
    #[serde(default)]
    pub properties: Properties,
}

/// Download statistics of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStats {
    pub uri: String,
    pub download_count: i64,
    pub last_downloaded: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_downloaded_by: Option<String>,
    pub remote_download_count: i64,
    pub remote_last_downloaded: i64,
}

/// Folder entry of a file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFolder {
    pub uri: String,
    pub size: i64,
    pub last_modified: String,
}

/// File entry of a file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFile {
    pub uri: String,
    pub size: i64,
    pub last_modified: String,
    pub sha1: Option<String>,
    pub sha2: Option<String>,
}

/// One entry of a file list, discriminated by the boolean `folder` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawListEntry", into = "RawListEntry")]
pub enum ListEntry {
    Folder(ListFolder),
    File(ListFile),
}

impl ListEntry {
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.uri,
            Self::File(file) => &file.uri,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListEntry {
    uri: String,
    #[serde(deserialize_with = "lenient::int")]
    size: i64,
    last_modified: String,
    #[serde(deserialize_with = "lenient::bool")]
    folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha2: Option<String>,
}

impl From<RawListEntry> for ListEntry {
    fn from(raw: RawListEntry) -> Self {
        if raw.folder {
            Self::Folder(ListFolder {
                uri: raw.uri,
                size: raw.size,
                last_modified: raw.last_modified,
            })
        } else {
            Self::File(ListFile {
                uri: raw.uri,
                size: raw.size,
                last_modified: raw.last_modified,
                sha1: raw.sha1,
                sha2: raw.sha2,
            })
        }
    }
}

impl From<ListEntry> for RawListEntry {
    fn from(entry: ListEntry) -> Self {
        match entry {
            ListEntry::Folder(folder) => Self {
                uri: folder.uri,
                size: folder.size,
                last_modified: folder.last_modified,
                folder: true,
                sha1: None,
                sha2: None,
            },
            ListEntry::File(file) => Self {
                uri: file.uri,
                size: file.size,
                last_modified: file.last_modified,
                folder: false,
                sha1: file.sha1,
                sha2: file.sha2,
            },
        }
    }
}

/// Answer of a file list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactList {
    pub uri: String,
    pub created: String,
    pub files: Vec<ListEntry>,
}

/// Options of a file list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// List the whole subtree (`deep=1`).
    pub recursive: bool,
    /// Maximum depth when recursive.
    pub depth: Option<u32>,
    /// Include folders in the answer.
    pub list_folders: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            depth: None,
            list_folders: true,
        }
    }
}
