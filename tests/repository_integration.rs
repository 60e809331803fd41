//! Integration tests for repository administration.

mod support;

use artifactory_core::models::repository::{
    LocalRepository, PackageType, RemoteRepository, Repository,
};
use artifactory_core::{ArtifactoryError, ResourceKind};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::client;

async fn mount_repo(server: &MockServer, key: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/repositories/{key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_repo_dispatches_on_rclass() {
    let server = MockServer::start().await;
    mount_repo(
        &server,
        "libs-local",
        json!({"key": "libs-local", "rclass": "local", "packageType": "maven", "xrayIndex": true}),
    )
    .await;
    mount_repo(
        &server,
        "libs-virtual",
        json!({"key": "libs-virtual", "rclass": "virtual", "repositories": ["libs-local"]}),
    )
    .await;
    mount_repo(
        &server,
        "central",
        json!({"key": "central", "rclass": "remote", "url": "https://repo1.maven.org/maven2"}),
    )
    .await;
    mount_repo(
        &server,
        "shared",
        json!({"key": "shared", "rclass": "federated", "members": [{"url": "https://a/artifactory/shared", "enabled": "true"}]}),
    )
    .await;
    let artifactory = client(&server);

    let local = artifactory.repositories.get_repo("libs-local").await.unwrap();
    match &local {
        Repository::Local(repo) => {
            assert_eq!(repo.common.package_type, PackageType::Maven);
            assert!(repo.xray_index);
        }
        other => panic!("expected local repository, got {other:?}"),
    }
    let virtual_repo = artifactory.repositories.get_repo("libs-virtual").await.unwrap();
    assert_eq!(virtual_repo.rclass(), "virtual");
    let remote = artifactory.repositories.get_repo("central").await.unwrap();
    assert_eq!(remote.rclass(), "remote");
    let federated = artifactory.repositories.get_repo("shared").await.unwrap();
    match federated {
        Repository::Federated(repo) => assert!(repo.members[0].enabled),
        other => panic!("expected federated repository, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_repo_without_rclass_falls_back_on_shape() {
    let server = MockServer::start().await;
    mount_repo(
        &server,
        "central",
        json!({"key": "central", "url": "https://repo1.maven.org/maven2"}),
    )
    .await;
    mount_repo(&server, "plain", json!({"key": "plain"})).await;
    let artifactory = client(&server);

    let remote = artifactory.repositories.get_repo("central").await.unwrap();
    assert_eq!(remote.rclass(), "remote");
    let local = artifactory.repositories.get_repo("plain").await.unwrap();
    assert_eq!(local.rclass(), "local");
}

#[tokio::test]
async fn test_get_repo_unknown_rclass_is_reported() {
    let server = MockServer::start().await;
    mount_repo(&server, "odd", json!({"key": "odd", "rclass": "distribution"})).await;
    let artifactory = client(&server);

    let result = artifactory.repositories.get_repo("odd").await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::UnknownRepositoryClass { ref rclass }) if rclass == "distribution"
    ));
}

#[tokio::test]
async fn test_get_repo_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let result = artifactory.repositories.get_repo("ghost").await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::NotFound {
            kind: ResourceKind::Repository,
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_repo_sends_rclass_and_reads_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories/new-local"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/api/repositories/new-local"))
        .and(body_partial_json(json!({
            "key": "new-local",
            "rclass": "local",
            "packageType": "generic",
            "handleReleases": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_repo(&server, "new-local", json!({"key": "new-local", "rclass": "local"})).await;
    let artifactory = client(&server);

    let created = artifactory
        .repositories
        .create_repo(&LocalRepository::new("new-local").into())
        .await
        .expect("create should succeed");

    assert_eq!(created.key(), "new-local");
}

#[tokio::test]
async fn test_create_repo_existing_is_already_exists() {
    let server = MockServer::start().await;
    mount_repo(&server, "central", json!({"key": "central", "rclass": "remote", "url": "https://x"})).await;
    let artifactory = client(&server);

    let result = artifactory
        .repositories
        .create_repo(&RemoteRepository::new("central", "https://x").into())
        .await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::AlreadyExists {
            kind: ResourceKind::Repository,
            ..
        })
    ));
}

#[tokio::test]
async fn test_update_repo_keeps_unmodelled_settings() {
    let server = MockServer::start().await;
    mount_repo(
        &server,
        "libs-local",
        json!({"key": "libs-local", "rclass": "local", "cdnRedirect": true}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/repositories/libs-local"))
        .and(body_partial_json(json!({
            "key": "libs-local",
            "description": "updated",
            "cdnRedirect": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let mut repository = artifactory.repositories.get_repo("libs-local").await.unwrap();
    if let Repository::Local(local) = &mut repository {
        local.common.description = Some("updated".into());
    }
    artifactory
        .repositories
        .update_repo(&repository)
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn test_delete_repo_classifies_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/artifactory/api/repositories/old"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    artifactory.repositories.delete("old").await.expect("delete should succeed");
    let result = artifactory.repositories.delete("ghost").await;
    assert!(result.as_ref().is_err_and(ArtifactoryError::is_not_found));
}

#[tokio::test]
async fn test_list_repositories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "libs-local", "type": "LOCAL", "url": "http://localhost/artifactory/libs-local", "packageType": "Maven"},
            {"key": "central", "type": "REMOTE", "description": "Maven Central", "url": "https://repo1.maven.org/maven2", "packageType": "Maven"}
        ])))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let repositories = artifactory.repositories.list().await.expect("list should succeed");

    assert_eq!(repositories.len(), 2);
    assert_eq!(repositories[1].repo_type, "REMOTE");
    assert_eq!(repositories[1].description.as_deref(), Some("Maven Central"));
}
