//! Resource managers, one per kind of server-side object.
//!
//! Every manager wraps a clone of the shared [`HttpClient`](crate::http::HttpClient)
//! and is itself cheap to clone. A manager's `get` is where HTTP statuses are
//! turned into domain errors; `create`, `update` and `delete` go through it.

mod aql;
pub mod artifact;
mod build;
mod group;
mod permission;
mod repository;
mod security;
mod user;

pub use aql::ArtifactoryAql;
pub use artifact::ArtifactoryArtifact;
pub use build::ArtifactoryBuild;
pub use group::ArtifactoryGroup;
pub use permission::ArtifactoryPermission;
pub use repository::ArtifactoryRepository;
pub use security::ArtifactorySecurity;
pub use user::ArtifactoryUser;

use crate::error::ArtifactoryError;

/// Replaces an unclassified HTTP error whose status is in `statuses` by the
/// domain error built by `mapped`. Any other error passes through.
pub(crate) fn classify(
    error: ArtifactoryError,
    statuses: &[u16],
    mapped: impl FnOnce() -> ArtifactoryError,
) -> ArtifactoryError {
    if error.has_status(statuses) {
        mapped()
    } else {
        error
    }
}
