//! Authenticated request dispatch shared by every resource manager.
//!
//! [`HttpClient`] owns the connection pool, the base URL and the credentials.
//! Managers build an [`ApiRequest`] for a route relative to
//! `<base>/artifactory/`, attach a body, and either [`send`](ApiRequest::send)
//! it (non-2xx becomes [`ArtifactoryError::Http`](crate::ArtifactoryError::Http))
//! or [`send_unchecked`](ApiRequest::send_unchecked) it when the status itself
//! carries the answer.

mod client;
pub mod constants;

pub use client::{ApiRequest, HttpClient, encode_path, read_json};
