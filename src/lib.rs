//! Artifactory Core Library
//!
//! A typed async client for the JFrog Artifactory REST API: request and
//! response models plus one manager per kind of server-side object.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Connection settings, credentials and environment loading
//! - [`http`] - Authenticated HTTP dispatcher shared by every manager
//! - [`api`] - Resource managers (artifacts, users, groups, repositories,
//!   permissions, builds, security, AQL)
//! - [`models`] - Serde models of the wire formats
//! - [`checksum`] - Local file digests for checksum deploys
//! - [`error`] - The [`ArtifactoryError`] type
//!
//! [`Artifactory`] bundles all managers over one connection pool.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
mod artifactory;
pub mod checksum;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
mod user_agent;

// Re-export commonly used types
pub use api::{
    ArtifactoryAql, ArtifactoryArtifact, ArtifactoryBuild, ArtifactoryGroup,
    ArtifactoryPermission, ArtifactoryRepository, ArtifactorySecurity, ArtifactoryUser,
};
pub use artifactory::Artifactory;
pub use config::{ApiVersion, ConnectionConfig, Credentials, SecretString};
pub use error::{ArtifactoryError, ResourceKind};
pub use http::HttpClient;
pub use models::artifact::{ArtifactInfo, Checksums, ListOptions, Properties};
