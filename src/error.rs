//! Error types for every Artifactory operation.
//!
//! Domain errors (not found, already exists, bad properties, ...) are produced
//! by the resource managers when they classify an HTTP status. Everything the
//! managers do not classify stays a generic [`ArtifactoryError::Http`] carrying
//! the original status and response body.

use std::fmt;
use std::path::PathBuf;

use reqwest::Method;
use thiserror::Error;

/// The kind of server-side resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Artifact,
    User,
    Group,
    Repository,
    Permission,
    Build,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Artifact => "artifact",
            Self::User => "user",
            Self::Group => "group",
            Self::Repository => "repository",
            Self::Permission => "permission",
            Self::Build => "build",
        };
        write!(f, "{label}")
    }
}

/// Errors returned by the Artifactory client.
#[derive(Debug, Error)]
pub enum ArtifactoryError {
    /// The requested resource does not exist on the server.
    #[error("{kind} {name} does not exist")]
    NotFound {
        /// Which resource manager raised the error.
        kind: ResourceKind,
        /// Key, name or path of the missing resource.
        name: String,
    },

    /// A create call found the resource already present.
    #[error("{kind} {name} already exists")]
    AlreadyExists {
        /// Which resource manager raised the error.
        kind: ResourceKind,
        /// Key or name of the existing resource.
        name: String,
    },

    /// None of the requested properties exist on the artifact.
    #[error("properties {names:?} were not found on artifact {path}")]
    PropertyNotFound {
        /// Artifact path that was queried.
        path: String,
        /// Property names that were requested (empty means "all").
        names: Vec<String>,
    },

    /// The server rejected a property value (forbidden characters).
    #[error("a property value for {path} includes forbidden special characters")]
    BadProperties {
        /// Artifact path the properties were sent to.
        path: String,
    },

    /// Token creation or revocation was given unusable data.
    #[error("invalid token data: {message}")]
    InvalidTokenData {
        /// Server `error_description` or local validation message.
        message: String,
    },

    /// The server refused an AQL query.
    #[error("AQL search failed: {message}")]
    Aql {
        /// Server response body.
        message: String,
    },

    /// Any HTTP error status the calling operation does not classify.
    #[error("HTTP {status} on {method} {url}")]
    Http {
        /// Request method.
        method: Method,
        /// Full request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body text, kept for diagnosis.
        body: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, ...).
    #[error("network error calling {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout calling {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// A response body could not be decoded into the expected model.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Local filesystem failure during download, deploy or checksum.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The local path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configured base URL or a built route is not a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// The caller passed a request the client refuses to send.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What is wrong with the request.
        message: String,
    },

    /// The server answered with data the client cannot make sense of.
    #[error("unexpected response: {message}")]
    InvalidResponse {
        /// What was unexpected.
        message: String,
    },

    /// A repository carried an `rclass` this client does not know.
    #[error("unknown repository type found in response: {rclass}")]
    UnknownRepositoryClass {
        /// The raw `rclass` value.
        rclass: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Connection configuration is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Which setting is wrong and why.
        message: String,
    },
}

impl ArtifactoryError {
    /// Creates a not-found error.
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Creates a property-not-found error.
    pub fn property_not_found(path: impl Into<String>, names: &[&str]) -> Self {
        Self::PropertyNotFound {
            path: path.into(),
            names: names.iter().map(ToString::to_string).collect(),
        }
    }

    /// Creates a bad-properties error.
    pub fn bad_properties(path: impl Into<String>) -> Self {
        Self::BadProperties { path: path.into() }
    }

    /// Creates an invalid-token-data error.
    pub fn invalid_token_data(message: impl Into<String>) -> Self {
        Self::InvalidTokenData {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http(method: Method, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            method,
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status of an unclassified [`Http`](Self::Http) error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when this is an HTTP error with one of `statuses`.
    #[must_use]
    pub fn has_status(&self, statuses: &[u16]) -> bool {
        self.status().is_some_and(|status| statuses.contains(&status))
    }

    /// Returns true for [`NotFound`](Self::NotFound) of any resource kind.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
