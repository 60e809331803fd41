//! Build-info models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::artifact::Properties;

fn default_true() -> bool {
    true
}

fn default_build_version() -> String {
    "1.0.1".to_string()
}

/// Optional query parameters of a build-info lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    pub started: Option<String>,
    pub diff: Option<String>,
    pub project: Option<String>,
}

impl BuildProperties {
    /// Query pairs for the fields that are set, in `started`, `diff`,
    /// `project` order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("started", self.started.as_deref()),
            ("diff", self.diff.as_deref()),
            ("project", self.project.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// Entry of the build list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleBuild {
    pub uri: String,
    pub last_started: String,
}

/// Answer of the build list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildListResponse {
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builds: Option<Vec<SimpleBuild>>,
}

/// One run of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub uri: String,
    pub started: String,
}

/// Every run of one build name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRuns {
    pub uri: String,
    #[serde(default)]
    pub builds_numbers: Vec<Run>,
}

/// Artifact recorded in a build module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArtifact {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Dependency recorded in a build module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDependency {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

/// A module of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildModule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<BuildArtifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<BuildDependency>>,
}

/// CI agent that produced a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAgent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Version-control state of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vcs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The `buildInfo` document of a build run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfoDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub build_agent: BuildAgent,
    #[serde(default)]
    pub agent: BuildAgent,
    #[serde(default)]
    pub started: String,
    #[serde(default)]
    pub duration_millis: i64,
    #[serde(default)]
    pub artifactory_principal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<Vec<Vcs>>,
    #[serde(default)]
    pub modules: Vec<BuildModule>,
}

/// Answer of a build-info lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub build_info: BuildInfoDetail,
}

/// License checks attached to a new build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseControl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_checks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_published_artifacts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_discover: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_violations_recipients_list: Option<String>,
}

/// Retention policy attached to a new build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRetention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_build_artifacts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_build_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_numbers_not_to_be_discarded: Option<Vec<String>>,
}

/// Issue tracker of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Issue a build resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated: Option<bool>,
}

/// Issues section of a new build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_build_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_build_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_issues: Option<Vec<AffectedIssue>>,
}

/// Payload for uploading a new build-info document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCreateRequest {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default = "default_build_version")]
    pub version: String,
    pub name: String,
    pub number: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_agent: Option<BuildAgent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<BuildAgent>,
    pub started: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifactory_plugin_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifactory_principal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<Vec<Vcs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_control: Option<LicenseControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_retention: Option<BuildRetention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<BuildModule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Issues>,
}

impl BuildCreateRequest {
    /// Minimal build-info document.
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        started: impl Into<String>,
    ) -> Self {
        Self {
            properties: BTreeMap::new(),
            version: default_build_version(),
            name: name.into(),
            number: number.into(),
            build_type: None,
            build_agent: None,
            agent: None,
            started: started.into(),
            artifactory_plugin_version: None,
            duration_millis: None,
            artifactory_principal: None,
            url: None,
            vcs: None,
            license_control: None,
            build_retention: None,
            modules: None,
            issues: None,
        }
    }
}

/// Payload for promoting a build between repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPromotionRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub ci_user: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub dry_run: bool,
    pub source_repo: String,
    pub target_repo: String,
    #[serde(default, rename = "copy")]
    pub copy_artifact: bool,
    #[serde(default = "default_true")]
    pub artifacts: bool,
    #[serde(default)]
    pub dependencies: bool,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default = "default_true")]
    pub fail_fast: bool,
}

impl BuildPromotionRequest {
    /// Promotion that moves artifacts from `source_repo` to `target_repo`.
    pub fn new(source_repo: impl Into<String>, target_repo: impl Into<String>) -> Self {
        Self {
            status: String::new(),
            comment: String::new(),
            ci_user: String::new(),
            timestamp: String::new(),
            dry_run: false,
            source_repo: source_repo.into(),
            target_repo: target_repo.into(),
            copy_artifact: false,
            artifacts: true,
            dependencies: false,
            scopes: Vec::new(),
            properties: Properties::new(),
            fail_fast: true,
        }
    }
}

/// Answer of a promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPromotionResult {
    #[serde(default)]
    pub messages: Vec<BTreeMap<String, String>>,
}

/// Payload for deleting build runs.
///
/// Either `build_numbers` is non-empty or `delete_all` is set; the manager
/// refuses anything else. `buildNumbers` is left out of the JSON when
/// `delete_all` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDeleteRequest {
    #[serde(default)]
    pub project: String,
    pub build_name: String,
    #[serde(default)]
    pub build_numbers: Vec<String>,
    #[serde(default)]
    pub delete_artifacts: bool,
    #[serde(default)]
    pub delete_all: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildDeleteWire<'a> {
    project: &'a str,
    build_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    build_numbers: Option<&'a [String]>,
    delete_artifacts: bool,
    delete_all: bool,
}

impl Serialize for BuildDeleteRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BuildDeleteWire {
            project: &self.project,
            build_name: &self.build_name,
            build_numbers: (!self.delete_all).then_some(self.build_numbers.as_slice()),
            delete_artifacts: self.delete_artifacts,
            delete_all: self.delete_all,
        }
        .serialize(serializer)
    }
}

impl BuildDeleteRequest {
    /// Deletes the listed runs of `build_name`.
    pub fn numbers(build_name: impl Into<String>, numbers: Vec<String>) -> Self {
        Self {
            build_name: build_name.into(),
            build_numbers: numbers,
            ..Self::default()
        }
    }

    /// Deletes every run of `build_name`.
    pub fn all(build_name: impl Into<String>) -> Self {
        Self {
            build_name: build_name.into(),
            delete_all: true,
            ..Self::default()
        }
    }

    /// True when the request names something to delete.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.delete_all || !self.build_numbers.is_empty()
    }
}

/// Per-category changes between two builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDiffDetail {
    #[serde(default)]
    pub updated: Vec<String>,
    #[serde(default)]
    pub unchanged: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub new: Vec<String>,
}

/// Answer of a build diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDiffResponse {
    #[serde(default)]
    pub artifacts: BuildDiffDetail,
    #[serde(default)]
    pub dependencies: BuildDiffDetail,
    #[serde(default)]
    pub properties: BuildDiffDetail,
}

/// One entry of a build error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildErrorDetail {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub message: String,
}

/// Error body of the build endpoints: `{"errors": [{status, message}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildError {
    #[serde(default)]
    pub errors: Vec<BuildErrorDetail>,
}

impl BuildError {
    /// One `Error status: <s> - <m>` line per entry.
    #[must_use]
    pub fn to_error_message(&self) -> String {
        self.errors
            .iter()
            .map(|error| format!("Error status: {} - {}", error.status, error.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
