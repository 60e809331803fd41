//! Repository models.
//!
//! The four repository classes share a common header ([`RepositoryCommon`]).
//! Class-specific settings the client does not model are kept verbatim in
//! each struct's `extra` map, so a get-modify-update cycle does not drop
//! them.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

fn default_includes_pattern() -> String {
    "**/*".to_string()
}

fn default_repo_layout_ref() -> String {
    "maven-2-default".to_string()
}

fn default_remote_checksum_policy() -> String {
    "generate-if-absent".to_string()
}

fn default_socket_timeout_millis() -> i64 {
    15000
}

fn default_retrieval_cache_period_secs() -> i64 {
    43200
}

/// Package format of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Alpine,
    Ansible,
    Bower,
    Cargo,
    Chef,
    Cocoapods,
    Composer,
    Conan,
    Conda,
    Cran,
    Debian,
    Docker,
    Gems,
    #[default]
    Generic,
    Gitlfs,
    Go,
    Gradle,
    Helm,
    Helmoci,
    Huggingfaceml,
    Ivy,
    Maven,
    Npm,
    Nuget,
    Oci,
    Opkg,
    P2,
    Pub,
    Puppet,
    Pypi,
    Rpm,
    Sbt,
    Swift,
    Terraform,
    Terraformbackend,
    Vagrant,
    Vcs,
    Yum,
}

/// Checksum policy of local and federated repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumPolicyType {
    #[default]
    ClientChecksums,
    ServerGeneratedChecksums,
}

/// Snapshot naming of Maven-style repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotVersionBehavior {
    Unique,
    #[default]
    NonUnique,
    Deployer,
}

/// What a virtual repository does with POM repository references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomRepositoryReferencesCleanupPolicy {
    #[default]
    DiscardActiveReference,
    DiscardAnyReference,
    Nothing,
}

/// Fields every repository class carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCommon {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(default)]
    pub package_type: PackageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_includes_pattern")]
    pub includes_pattern: String,
    #[serde(default)]
    pub excludes_pattern: String,
    #[serde(default = "default_repo_layout_ref")]
    pub repo_layout_ref: String,
}

impl RepositoryCommon {
    /// A generic repository header with server defaults.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            project_key: None,
            package_type: PackageType::Generic,
            description: None,
            notes: None,
            includes_pattern: default_includes_pattern(),
            excludes_pattern: String::new(),
            repo_layout_ref: default_repo_layout_ref(),
        }
    }
}

/// A local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRepository {
    #[serde(flatten)]
    pub common: RepositoryCommon,
    #[serde(default)]
    pub checksum_policy_type: ChecksumPolicyType,
    #[serde(default = "default_true")]
    pub handle_releases: bool,
    #[serde(default = "default_true")]
    pub handle_snapshots: bool,
    #[serde(default)]
    pub max_unique_snapshots: i64,
    #[serde(default)]
    pub snapshot_version_behavior: SnapshotVersionBehavior,
    #[serde(default)]
    pub blacked_out: bool,
    #[serde(default)]
    pub xray_index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_sets: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            common: RepositoryCommon::new(key),
            checksum_policy_type: ChecksumPolicyType::default(),
            handle_releases: true,
            handle_snapshots: true,
            max_unique_snapshots: 0,
            snapshot_version_behavior: SnapshotVersionBehavior::default(),
            blacked_out: false,
            xray_index: false,
            property_sets: None,
            extra: Map::new(),
        }
    }
}

/// A virtual repository aggregating other repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRepository {
    #[serde(flatten)]
    pub common: RepositoryCommon,
    pub repositories: Vec<String>,
    #[serde(default)]
    pub artifactory_requests_can_retrieve_remote_artifacts: bool,
    #[serde(default)]
    pub pom_repository_references_cleanup_policy: PomRepositoryReferencesCleanupPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_deployment_repo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VirtualRepository {
    pub fn new(key: impl Into<String>, repositories: Vec<String>) -> Self {
        Self {
            common: RepositoryCommon::new(key),
            repositories,
            artifactory_requests_can_retrieve_remote_artifacts: false,
            pom_repository_references_cleanup_policy:
                PomRepositoryReferencesCleanupPolicy::default(),
            default_deployment_repo: None,
            extra: Map::new(),
        }
    }
}

/// A remote repository proxying an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepository {
    #[serde(flatten)]
    pub common: RepositoryCommon,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<super::SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default = "default_remote_checksum_policy")]
    pub remote_repo_checksum_policy_type: String,
    #[serde(default = "default_true")]
    pub handle_releases: bool,
    #[serde(default = "default_true")]
    pub handle_snapshots: bool,
    #[serde(default)]
    pub hard_fail: bool,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub blacked_out: bool,
    #[serde(default = "default_true")]
    pub store_artifacts_locally: bool,
    #[serde(default = "default_socket_timeout_millis")]
    pub socket_timeout_millis: i64,
    #[serde(default = "default_retrieval_cache_period_secs")]
    pub retrieval_cache_period_secs: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteRepository {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            common: RepositoryCommon::new(key),
            url: url.into(),
            username: None,
            password: None,
            proxy: None,
            remote_repo_checksum_policy_type: default_remote_checksum_policy(),
            handle_releases: true,
            handle_snapshots: true,
            hard_fail: false,
            offline: false,
            blacked_out: false,
            store_artifacts_locally: true,
            socket_timeout_millis: default_socket_timeout_millis(),
            retrieval_cache_period_secs: default_retrieval_cache_period_secs(),
            extra: Map::new(),
        }
    }
}

/// A member of a federation. Requests send `enabled` as a string, answers
/// as a boolean; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedMember {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_true", deserialize_with = "super::lenient::bool")]
    pub enabled: bool,
}

/// A federated repository, mirrored across instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedRepository {
    #[serde(flatten)]
    pub common: RepositoryCommon,
    pub members: Vec<FederatedMember>,
    #[serde(default)]
    pub checksum_policy_type: ChecksumPolicyType,
    #[serde(default = "default_true")]
    pub handle_releases: bool,
    #[serde(default = "default_true")]
    pub handle_snapshots: bool,
    #[serde(default)]
    pub snapshot_version_behavior: SnapshotVersionBehavior,
    #[serde(default)]
    pub xray_index: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FederatedRepository {
    pub fn new(key: impl Into<String>, members: Vec<FederatedMember>) -> Self {
        Self {
            common: RepositoryCommon::new(key),
            members,
            checksum_policy_type: ChecksumPolicyType::default(),
            handle_releases: true,
            handle_snapshots: true,
            snapshot_version_behavior: SnapshotVersionBehavior::default(),
            xray_index: false,
            extra: Map::new(),
        }
    }
}

/// Repository classes the client understands, as reported in `rclass`.
pub const KNOWN_RCLASSES: [&str; 4] = ["local", "virtual", "remote", "federated"];

/// Any repository, tagged on the wire by `rclass`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rclass", rename_all = "lowercase")]
pub enum Repository {
    Local(LocalRepository),
    Virtual(VirtualRepository),
    Remote(RemoteRepository),
    Federated(FederatedRepository),
}

impl Repository {
    #[must_use]
    pub fn common(&self) -> &RepositoryCommon {
        match self {
            Self::Local(repo) => &repo.common,
            Self::Virtual(repo) => &repo.common,
            Self::Remote(repo) => &repo.common,
            Self::Federated(repo) => &repo.common,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.common().key
    }

    /// The `rclass` this repository serializes with.
    #[must_use]
    pub fn rclass(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Virtual(_) => "virtual",
            Self::Remote(_) => "remote",
            Self::Federated(_) => "federated",
        }
    }
}

impl From<LocalRepository> for Repository {
    fn from(repo: LocalRepository) -> Self {
        Self::Local(repo)
    }
}

impl From<VirtualRepository> for Repository {
    fn from(repo: VirtualRepository) -> Self {
        Self::Virtual(repo)
    }
}

impl From<RemoteRepository> for Repository {
    fn from(repo: RemoteRepository) -> Self {
        Self::Remote(repo)
    }
}

impl From<FederatedRepository> for Repository {
    fn from(repo: FederatedRepository) -> Self {
        Self::Federated(repo)
    }
}

impl<'de> Deserialize<'de> for Repository {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        let rclass = value
            .as_object_mut()
            .ok_or_else(|| de::Error::custom("repository must be a JSON object"))?
            .remove("rclass");

        match rclass {
            Some(Value::String(rclass)) => match rclass.as_str() {
                "local" => LocalRepository::deserialize(value).map(Self::Local),
                "virtual" => VirtualRepository::deserialize(value).map(Self::Virtual),
                "remote" => RemoteRepository::deserialize(value).map(Self::Remote),
                "federated" => FederatedRepository::deserialize(value).map(Self::Federated),
                other => {
                    return Err(de::Error::custom(format!(
                        "unknown repository type found in response: {other}"
                    )));
                }
            }
            .map_err(de::Error::custom),
            Some(other) => Err(de::Error::custom(format!(
                "rclass must be a string, got {other}"
            ))),
            // No class: the first shape whose required field is present wins.
            None => FederatedRepository::deserialize(&value)
                .map(Self::Federated)
                .or_else(|_| RemoteRepository::deserialize(&value).map(Self::Remote))
                .or_else(|_| VirtualRepository::deserialize(&value).map(Self::Virtual))
                .or_else(|_| LocalRepository::deserialize(&value).map(Self::Local))
                .map_err(de::Error::custom),
        }
    }
}

/// Entry of the repository list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRepository {
    pub key: String,
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub package_type: String,
}
