//! Shared helpers for integration tests: a client pointed at a mock server
//! and canned storage-info bodies.

#![allow(dead_code)]

use artifactory_core::{Artifactory, ConnectionConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client for `server`, authenticated with basic credentials.
pub fn client(server: &MockServer) -> Artifactory {
    let config = ConnectionConfig::new(server.uri()).with_basic_auth("admin", "password");
    Artifactory::new(&config).expect("client should build")
}

/// Storage info body of a folder. `children` are `(name, is_folder)` pairs.
pub fn folder_info(repo: &str, repo_path: &str, children: &[(&str, bool)]) -> Value {
    let children: Vec<Value> = children
        .iter()
        .map(|(name, folder)| json!({"uri": format!("/{name}"), "folder": folder}))
        .collect();
    json!({
        "repo": repo,
        "path": repo_path,
        "created": "2024-01-01T00:00:00.000Z",
        "createdBy": "admin",
        "lastModified": "2024-01-01T00:00:00.000Z",
        "modifiedBy": "admin",
        "lastUpdated": "2024-01-01T00:00:00.000Z",
        "uri": format!("http://localhost/artifactory/api/storage/{repo}{repo_path}"),
        "children": children,
    })
}

/// Storage info body of a file.
pub fn file_info(repo: &str, repo_path: &str, size: u64) -> Value {
    json!({
        "repo": repo,
        "path": repo_path,
        "created": "2024-01-01T00:00:00.000Z",
        "createdBy": "admin",
        "lastModified": "2024-01-01T00:00:00.000Z",
        "modifiedBy": "admin",
        "lastUpdated": "2024-01-01T00:00:00.000Z",
        "downloadUri": format!("http://localhost/artifactory/{repo}{repo_path}"),
        "mimeType": "application/octet-stream",
        "size": size.to_string(),
        "checksums": {
            "sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
            "md5": "d41d8cd98f00b204e9800998ecf8427e",
            "sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        },
        "originalChecksums": {},
        "uri": format!("http://localhost/artifactory/api/storage/{repo}{repo_path}"),
    })
}

/// Answers `GET /artifactory/api/storage/<artifact_path>` with `body`.
pub async fn mount_info(server: &MockServer, artifact_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{artifact_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers `GET /artifactory/<artifact_path>` with `content`.
pub async fn mount_content(server: &MockServer, artifact_path: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/artifactory/{artifact_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}
