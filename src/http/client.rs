//! Authenticated HTTP dispatcher for the Artifactory REST API.
//!
//! Every call goes to `<host>/artifactory/<route>`. The configured URL may be
//! given with or without the `/artifactory` suffix; both resolve to the same
//! host.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Certificate, Client, Identity, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::constants::{ARTIFACTORY_PREFIX, CONNECT_TIMEOUT_SECS};
use crate::config::{ConnectionConfig, Credentials};
use crate::error::ArtifactoryError;
use crate::user_agent;

/// Shared HTTP client: connection pool, base URL and credentials.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    host: String,
    credentials: Credentials,
}

impl HttpClient {
    /// Creates a client from a validated connection configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Config`] when the configuration is invalid
    /// or a certificate does not parse, [`ArtifactoryError::Io`] when a
    /// certificate file cannot be read, and
    /// [`ArtifactoryError::ClientBuild`] when reqwest rejects the settings.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ArtifactoryError> {
        config.validate()?;
        let host = normalize_base_url(&config.url)?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(path) = &config.ca_certificate {
            let pem = std::fs::read(path).map_err(|e| ArtifactoryError::io(path.clone(), e))?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| {
                ArtifactoryError::config(format!(
                    "invalid CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            builder = builder.add_root_certificate(certificate);
        }
        if let Some(path) = &config.client_certificate {
            let pem = std::fs::read(path).map_err(|e| ArtifactoryError::io(path.clone(), e))?;
            let identity = Identity::from_pem(&pem).map_err(|e| {
                ArtifactoryError::config(format!(
                    "invalid client certificate {}: {e}",
                    path.display()
                ))
            })?;
            builder = builder.identity(identity);
        }
        let client = builder
            .build()
            .map_err(|source| ArtifactoryError::ClientBuild { source })?;

        debug!(host = %host, "artifactory client ready");
        Ok(Self {
            client,
            host,
            credentials: config.credentials.clone(),
        })
    }

    /// Server host URL with any `/artifactory` suffix removed.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Absolute URL for a route relative to `<host>/artifactory/`.
    ///
    /// The route may already carry a query (`api/storage/repo?list`); extra
    /// pairs added through [`ApiRequest::query`] are appended to it.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidUrl`] when the result does not parse.
    pub fn url_for(&self, route: &str) -> Result<Url, ArtifactoryError> {
        let raw = format!(
            "{}/{ARTIFACTORY_PREFIX}/{}",
            self.host,
            route.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|_| ArtifactoryError::invalid_url(raw))
    }

    /// Starts a request for `route`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidUrl`] when the route does not form a
    /// valid URL.
    pub fn request(&self, method: Method, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        Ok(ApiRequest {
            client: self,
            method,
            url: self.url_for(route)?,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Shorthand for a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn get(&self, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        self.request(Method::GET, route)
    }

    /// Shorthand for a POST request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn post(&self, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        self.request(Method::POST, route)
    }

    /// Shorthand for a PUT request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn put(&self, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        self.request(Method::PUT, route)
    }

    /// Shorthand for a PATCH request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn patch(&self, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        self.request(Method::PATCH, route)
    }

    /// Shorthand for a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn delete(&self, route: &str) -> Result<ApiRequest<'_>, ArtifactoryError> {
        self.request(Method::DELETE, route)
    }
}

/// A request under construction.
#[derive(Debug)]
pub struct ApiRequest<'a> {
    client: &'a HttpClient,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Body>,
}

impl ApiRequest<'_> {
    /// Appends a URL-encoded query pair.
    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Appends several query pairs in order.
    #[must_use]
    pub fn query_pairs<'p>(mut self, pairs: impl IntoIterator<Item = (&'p str, &'p str)>) -> Self {
        {
            let mut serializer = self.url.query_pairs_mut();
            for (key, value) in pairs {
                serializer.append_pair(key, value);
            }
        }
        self
    }

    /// Sets a request header. Invalid header text is ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => debug!(header = name, "dropping invalid header"),
        }
        self
    }

    /// Sends `value` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::InvalidRequest`] when `value` does not
    /// serialize.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ArtifactoryError> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            ArtifactoryError::invalid_request(format!("could not serialize request body: {e}"))
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Body::from(bytes));
        Ok(self)
    }

    /// Sends URL-encoded form fields.
    #[must_use]
    pub fn form<'p>(mut self, fields: impl IntoIterator<Item = (&'p str, &'p str)>) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = Some(Body::from(encoded));
        self
    }

    /// Sends a plain-text body.
    #[must_use]
    pub fn text(mut self, body: String) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        self.body = Some(Body::from(body));
        self
    }

    /// Sends an arbitrary (possibly streaming) body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The URL this request will hit.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Sends the request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Timeout`] or [`ArtifactoryError::Network`]
    /// on transport failures.
    #[instrument(skip(self), fields(method = %self.method, url = %self.url))]
    pub async fn send_unchecked(self) -> Result<Response, ArtifactoryError> {
        let url = self.url.to_string();
        let mut builder = self
            .client
            .client
            .request(self.method, self.url)
            .headers(self.headers);
        builder = match &self.client.credentials {
            Credentials::Anonymous => builder,
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose()))
            }
            Credentials::Bearer(token) => builder.bearer_auth(token.expose()),
        };
        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ArtifactoryError::timeout(url.as_str())
            } else {
                ArtifactoryError::network(url.as_str(), e)
            }
        })?;
        debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Sends the request and fails on any non-2xx status.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactoryError::Http`] carrying the status and body for a
    /// non-2xx answer, plus the transport errors of
    /// [`send_unchecked`](Self::send_unchecked).
    pub async fn send(self) -> Result<Response, ArtifactoryError> {
        let method = self.method.clone();
        let response = self.send_unchecked().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(ArtifactoryError::http(method, url, status.as_u16(), body))
    }

    /// Sends the request and decodes a JSON answer.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), plus [`ArtifactoryError::Decode`].
    pub async fn fetch_json<T: DeserializeOwned>(self) -> Result<T, ArtifactoryError> {
        read_json(self.send().await?).await
    }
}

/// Reads and decodes a JSON response body.
///
/// # Errors
///
/// Returns [`ArtifactoryError::Network`] when the body cannot be read and
/// [`ArtifactoryError::Decode`] when it does not match `T`.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ArtifactoryError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ArtifactoryError::network(url.as_str(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| ArtifactoryError::decode(url, e))
}

/// Percent-encodes each `/`-separated segment of an artifact path.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strips a trailing `/` and then a trailing `/artifactory` from `url`.
fn normalize_base_url(url: &str) -> Result<String, ArtifactoryError> {
    let trimmed = url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_suffix(&format!("/{ARTIFACTORY_PREFIX}"))
        .unwrap_or(trimmed);
    Url::parse(host).map_err(|_| ArtifactoryError::invalid_url(url))?;
    Ok(host.to_string())
}
