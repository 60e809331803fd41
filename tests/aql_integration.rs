//! Integration tests for AQL search.

mod support;

use artifactory_core::ArtifactoryError;
use artifactory_core::models::aql::{Aql, AqlSort, SortOrder};
use serde_json::json;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::client;

#[tokio::test]
async fn test_query_posts_rendered_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/search/aql"))
        .and(body_string(
            r#"items.find({"repo":"libs-local"}).include("name","repo").sort({"$asc":["name"]}).limit(2)"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"repo": "libs-local", "name": "a.jar"},
                {"repo": "libs-local", "name": "b.jar"}
            ],
            "range": {"start_pos": 0, "end_pos": 2, "total": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let criteria = json!({"repo": "libs-local"});
    let mut aql = Aql::find(criteria.as_object().cloned().unwrap_or_default());
    aql.include = vec!["name".into(), "repo".into()];
    aql.sort = Some(AqlSort {
        order: SortOrder::Asc,
        fields: vec!["name".into()],
    });
    aql.limit = Some(2);

    let results = artifactory.aql.query(&aql).await.expect("query should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[1]["name"], "b.jar");
}

#[tokio::test]
async fn test_query_refused_is_aql_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/search/aql"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Failed to parse query"))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let result = artifactory.aql.query(&Aql::default()).await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::Aql { ref message }) if message == "Failed to parse query"
    ));
}

#[tokio::test]
async fn test_query_server_error_stays_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let result = artifactory.aql.query(&Aql::default()).await;

    assert!(matches!(result, Err(ArtifactoryError::Http { status: 500, .. })));
}
