//! User-Agent string sent with every Artifactory request.

/// Default User-Agent identifying the client and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("artifactory/{version}")
}
