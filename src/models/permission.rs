//! Permission target models for both API schemas.
//!
//! The v1 schema is one flat target per name; v2 splits a target into
//! repository, build and release-bundle sections and uses spelled-out
//! action names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entry of the permission list (both schemas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePermission {
    pub name: String,
    pub uri: String,
}

/// v1 action codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionAction {
    #[serde(rename = "m")]
    Admin,
    #[serde(rename = "d")]
    Delete,
    #[serde(rename = "w")]
    Deploy,
    #[serde(rename = "n")]
    Annotate,
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "x")]
    Distribute,
    #[serde(rename = "mxm")]
    ManagedXrayMeta,
}

/// v2 action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionActionV2 {
    Manage,
    Delete,
    Write,
    Annotate,
    Read,
    Distribute,
    ManagedXrayMeta,
}

/// Users and groups granted v1 actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeMap<String, Vec<PermissionAction>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<PermissionAction>>>,
}

/// A v1 permission target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub name: String,
    #[serde(default = "default_includes_pattern")]
    pub includes_pattern: String,
    #[serde(default)]
    pub excludes_pattern: String,
    pub repositories: Vec<String>,
    #[serde(default)]
    pub principals: Principals,
}

fn default_includes_pattern() -> String {
    "**".to_string()
}

impl Permission {
    pub fn new(name: impl Into<String>, repositories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            includes_pattern: default_includes_pattern(),
            excludes_pattern: String::new(),
            repositories,
            principals: Principals::default(),
        }
    }
}

/// Users and groups granted v2 actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsV2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeMap<String, Vec<PermissionActionV2>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<PermissionActionV2>>>,
}

/// One section (repo, build or release bundle) of a v2 target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTarget {
    #[serde(rename = "include-patterns")]
    pub include_patterns: Vec<String>,
    #[serde(rename = "exclude-patterns")]
    pub exclude_patterns: Vec<String>,
    pub repositories: Vec<String>,
    #[serde(default)]
    pub actions: ActionsV2,
}

impl PermissionTarget {
    /// Repository section matching everything in `repositories`.
    #[must_use]
    pub fn repo(repositories: Vec<String>) -> Self {
        Self {
            include_patterns: vec!["**".into()],
            exclude_patterns: vec![String::new()],
            repositories,
            actions: ActionsV2::default(),
        }
    }

    /// Build section over the build-info repository.
    #[must_use]
    pub fn build() -> Self {
        Self {
            include_patterns: vec![String::new()],
            exclude_patterns: vec![String::new()],
            repositories: vec!["artifactory-build-info".into()],
            actions: ActionsV2::default(),
        }
    }

    /// Release-bundle section over `repositories`.
    #[must_use]
    pub fn release_bundle(repositories: Vec<String>) -> Self {
        Self {
            include_patterns: vec!["**".into()],
            exclude_patterns: Vec::new(),
            repositories,
            actions: ActionsV2::default(),
        }
    }
}

/// A v2 permission target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionV2 {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<PermissionTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<PermissionTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_bundle: Option<PermissionTarget>,
}

impl PermissionV2 {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo: None,
            build: None,
            release_bundle: None,
        }
    }
}

/// A permission target of either schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnyPermission {
    V1(Permission),
    V2(PermissionV2),
}

impl AnyPermission {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::V1(permission) => &permission.name,
            Self::V2(permission) => &permission.name,
        }
    }
}

impl From<Permission> for AnyPermission {
    fn from(permission: Permission) -> Self {
        Self::V1(permission)
    }
}

impl From<PermissionV2> for AnyPermission {
    fn from(permission: PermissionV2) -> Self {
        Self::V2(permission)
    }
}
