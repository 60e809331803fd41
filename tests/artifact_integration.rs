//! Integration tests for artifact operations against a mock Artifactory.
//!
//! The tree used by the walk and download tests:
//!
//! ```text
//! repo/root/
//!   b.txt
//!   sub/
//!     c.txt
//!   a.txt
//! ```
//!
//! The server lists `b.txt`, `sub`, `a.txt` in that order; subfolders are
//! walked before files.

mod support;

use artifactory_core::{ArtifactInfo, ArtifactoryError, ListOptions, Properties, ResourceKind};
use futures_util::{StreamExt, TryStreamExt};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{client, file_info, folder_info, mount_content, mount_info};

async fn mount_tree(server: &MockServer) {
    mount_info(
        server,
        "repo/root",
        folder_info("repo", "/root", &[("b.txt", false), ("sub", true), ("a.txt", false)]),
    )
    .await;
    mount_info(server, "repo/root/sub", folder_info("repo", "/root/sub", &[("c.txt", false)])).await;
    mount_info(server, "repo/root/b.txt", file_info("repo", "/root/b.txt", 2)).await;
    mount_info(server, "repo/root/a.txt", file_info("repo", "/root/a.txt", 2)).await;
    mount_info(server, "repo/root/sub/c.txt", file_info("repo", "/root/sub/c.txt", 2)).await;
    mount_content(server, "repo/root/b.txt", b"bb").await;
    mount_content(server, "repo/root/a.txt", b"aa").await;
    mount_content(server, "repo/root/sub/c.txt", b"cc").await;
}

#[tokio::test]
async fn test_walk_topdown_yields_folder_before_descendants() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);

    let paths: Vec<String> = artifactory
        .artifacts
        .walk("repo/root", true)
        .map_ok(|info| info.full_path())
        .try_collect()
        .await
        .expect("walk should succeed");

    assert_eq!(
        paths,
        vec![
            "repo/root",
            "repo/root/sub",
            "repo/root/sub/c.txt",
            "repo/root/b.txt",
            "repo/root/a.txt",
        ]
    );
}

#[tokio::test]
async fn test_walk_bottom_up_yields_folder_after_descendants() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);

    let paths: Vec<String> = artifactory
        .artifacts
        .walk("repo/root/", false)
        .map_ok(|info| info.full_path())
        .try_collect()
        .await
        .expect("walk should succeed");

    assert_eq!(
        paths,
        vec![
            "repo/root/sub/c.txt",
            "repo/root/sub",
            "repo/root/b.txt",
            "repo/root/a.txt",
            "repo/root",
        ]
    );
}

#[tokio::test]
async fn test_walk_of_file_yields_only_the_file() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);

    let nodes: Vec<_> = artifactory
        .artifacts
        .walk("repo/root/a.txt", true)
        .try_collect()
        .await
        .expect("walk should succeed");

    assert_eq!(nodes.len(), 1);
    assert!(!nodes[0].is_folder());
}

#[tokio::test]
async fn test_walk_stops_at_first_error() {
    let server = MockServer::start().await;
    mount_info(&server, "repo/broken", folder_info("repo", "/broken", &[("gone", true)])).await;
    let artifactory = client(&server);

    let results: Vec<_> = artifactory.artifacts.walk("repo/broken", true).collect().await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(ArtifactoryError::NotFound {
            kind: ResourceKind::Artifact,
            ..
        })
    ));
}

#[tokio::test]
async fn test_download_folder_mirrors_tree_under_basename() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .download("/repo/root/", temp_dir.path(), false)
        .await
        .expect("download should succeed");

    assert_eq!(result, temp_dir.path().join("root"));
    assert_eq!(std::fs::read(result.join("a.txt")).unwrap(), b"aa");
    assert_eq!(std::fs::read(result.join("b.txt")).unwrap(), b"bb");
    assert_eq!(std::fs::read(result.join("sub/c.txt")).unwrap(), b"cc");
}

/// Files and directories under `dir`, at any depth.
fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                1 + count_entries(&entry.path())
            } else {
                1
            }
        })
        .sum()
}

#[tokio::test]
async fn test_download_creates_one_entry_per_walked_node() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let nodes: Vec<_> = artifactory
        .artifacts
        .walk("repo/root", true)
        .try_collect()
        .await
        .expect("walk should succeed");
    artifactory
        .artifacts
        .download("repo/root", temp_dir.path(), false)
        .await
        .expect("download should succeed");

    assert_eq!(nodes.len(), 5);
    assert_eq!(count_entries(temp_dir.path()), nodes.len());
}

#[tokio::test]
async fn test_download_flat_puts_every_file_in_destination() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .download("repo/root", temp_dir.path(), true)
        .await
        .expect("download should succeed");

    assert_eq!(result, temp_dir.path());
    for (name, content) in [("a.txt", b"aa"), ("b.txt", b"bb"), ("c.txt", b"cc")] {
        assert_eq!(std::fs::read(temp_dir.path().join(name)).unwrap(), content);
    }
    assert!(!temp_dir.path().join("root").exists());
    assert!(!temp_dir.path().join("sub").exists());
}

#[tokio::test]
async fn test_download_single_file() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .download("repo/root/sub/c.txt", temp_dir.path(), false)
        .await
        .expect("download should succeed");

    assert_eq!(result, temp_dir.path().join("c.txt"));
    assert_eq!(std::fs::read(&result).unwrap(), b"cc");
}

#[tokio::test]
async fn test_download_missing_path_is_not_found() {
    let server = MockServer::start().await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .download("repo/missing", temp_dir.path(), false)
        .await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::NotFound { kind: ResourceKind::Artifact, ref name }) if name == "repo/missing"
    ));
}

#[tokio::test]
async fn test_download_failed_content_leaves_no_file() {
    let server = MockServer::start().await;
    mount_info(&server, "repo/gone.txt", file_info("repo", "/gone.txt", 4)).await;
    Mock::given(method("GET"))
        .and(path("/artifactory/repo/gone.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let artifactory = client(&server);
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .download("repo/gone.txt", temp_dir.path(), false)
        .await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("gone.txt").exists());
}

#[tokio::test]
async fn test_stream_yields_content() {
    let server = MockServer::start().await;
    mount_content(&server, "repo/file.bin", b"0123456789").await;
    let artifactory = client(&server);

    let chunks: Vec<_> = artifactory
        .artifacts
        .stream("repo/file.bin")
        .await
        .expect("stream should open")
        .try_collect()
        .await
        .expect("stream should complete");

    let content: Vec<u8> = chunks.iter().flat_map(|chunk| chunk.to_vec()).collect();
    assert_eq!(content, b"0123456789");
    assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
}

#[tokio::test]
async fn test_info_decodes_file_and_folder() {
    let server = MockServer::start().await;
    mount_tree(&server).await;
    let artifactory = client(&server);

    let folder = artifactory.artifacts.info("repo/root").await.unwrap();
    assert!(folder.is_folder());

    let file = artifactory.artifacts.info("/repo/root/a.txt").await.unwrap();
    assert!(!file.is_folder());
    assert_eq!(file.path(), "/root/a.txt");
}

#[tokio::test]
async fn test_info_missing_is_not_found() {
    let server = MockServer::start().await;
    let artifactory = client(&server);

    let result = artifactory.artifacts.info("repo/nothing").await;

    assert!(result.as_ref().is_err_and(ArtifactoryError::is_not_found));
}

#[tokio::test]
async fn test_info_server_error_stays_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/x"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let result = artifactory.artifacts.info("repo/x").await;

    match result {
        Err(ArtifactoryError::Http { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deploy_directory_puts_each_file() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/repo/x/a/b.txt"))
        .and(header("X-Checksum-Deploy", "false"))
        .and(header(
            "X-Checksum-Sha1",
            "a9993e364706816aba3e25717850c26c9cd0d89d",
        ))
        .and(header("X-Checksum", "900150983cd24fb0d6963f7d28e17f72"))
        .and(body_bytes(b"abc".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/repo/x/top.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "repo/x", folder_info("repo", "/x", &[("a", true), ("top.txt", false)])).await;
    let artifactory = client(&server);

    let local = TempDir::new().expect("failed to create temp dir");
    std::fs::create_dir_all(local.path().join("a")).unwrap();
    std::fs::write(local.path().join("a/b.txt"), b"abc").unwrap();
    std::fs::write(local.path().join("top.txt"), b"top").unwrap();

    let info = artifactory
        .artifacts
        .deploy(local.path(), "repo/x", None, false)
        .await
        .expect("deploy should succeed");

    assert!(info.is_folder());
    assert_eq!(info.full_path(), "repo/x");
}

#[tokio::test]
async fn test_deploy_directory_then_nested_file_info() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/repo/x/a/b.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "repo/x", folder_info("repo", "/x", &[("a", true)])).await;
    mount_info(&server, "repo/x/a/b.txt", file_info("repo", "/x/a/b.txt", 3)).await;
    let artifactory = client(&server);

    let local = TempDir::new().expect("failed to create temp dir");
    std::fs::create_dir_all(local.path().join("a")).unwrap();
    std::fs::write(local.path().join("a/b.txt"), b"abc").unwrap();

    artifactory
        .artifacts
        .deploy(local.path(), "repo/x", None, false)
        .await
        .expect("deploy should succeed");
    let info = artifactory
        .artifacts
        .info("repo/x/a/b.txt")
        .await
        .expect("deployed file should exist");

    match info {
        ArtifactInfo::File(file) => assert!(file.base.path.ends_with("/a/b.txt")),
        other => panic!("expected file info, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deploy_file_with_properties_uses_matrix_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/repo/f.txt;os=linux,darwin;team=core"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "repo/f.txt", file_info("repo", "/f.txt", 1)).await;
    let artifactory = client(&server);

    let local = TempDir::new().expect("failed to create temp dir");
    let file = local.path().join("f.txt");
    std::fs::write(&file, b"f").unwrap();
    let mut properties = Properties::new();
    properties.insert("team".into(), vec!["core".into()]);
    properties.insert("os".into(), vec!["linux".into(), "darwin".into()]);

    let info = artifactory
        .artifacts
        .deploy(&file, "/repo/f.txt", Some(&properties), false)
        .await
        .expect("deploy should succeed");

    assert_eq!(info.full_path(), "repo/f.txt");
}

#[tokio::test]
async fn test_deploy_rejected_properties_is_bad_properties() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let local = TempDir::new().expect("failed to create temp dir");
    let file = local.path().join("f.txt");
    std::fs::write(&file, b"f").unwrap();
    let mut properties = Properties::new();
    properties.insert("bad".into(), vec!["a|b".into()]);

    let result = artifactory
        .artifacts
        .deploy(&file, "repo/f.txt", Some(&properties), false)
        .await;

    assert!(matches!(result, Err(ArtifactoryError::BadProperties { .. })));
}

#[tokio::test]
async fn test_checksum_deploy_sends_no_body_and_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/repo/f.txt"))
        .and(header("X-Checksum-Deploy", "true"))
        .and(body_bytes(Vec::new()))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let local = TempDir::new().expect("failed to create temp dir");
    let file = local.path().join("f.txt");
    std::fs::write(&file, b"content").unwrap();

    let result = artifactory.artifacts.deploy(&file, "repo/f.txt", None, true).await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::NotFound {
            kind: ResourceKind::Artifact,
            ..
        })
    ));
}

#[tokio::test]
async fn test_deploy_missing_local_path_is_io_error() {
    let server = MockServer::start().await;
    let artifactory = client(&server);
    let local = TempDir::new().expect("failed to create temp dir");

    let result = artifactory
        .artifacts
        .deploy(&local.path().join("nope"), "repo/nope", None, false)
        .await;

    assert!(matches!(result, Err(ArtifactoryError::Io { .. })));
}

#[tokio::test]
async fn test_properties_requests_named_properties() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/f.txt"))
        .and(query_param("properties", "team,os"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "http://localhost/artifactory/api/storage/repo/f.txt",
            "properties": {"team": ["core"], "os": ["linux", "darwin"]}
        })))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let response = artifactory
        .artifacts
        .properties("repo/f.txt", &["team", "os"])
        .await
        .expect("properties should be found");

    assert_eq!(response.properties["os"], vec!["linux", "darwin"]);
}

#[tokio::test]
async fn test_properties_404_is_property_not_found() {
    let server = MockServer::start().await;
    let artifactory = client(&server);

    let result = artifactory.artifacts.properties("repo/f.txt", &["missing"]).await;

    match result {
        Err(ArtifactoryError::PropertyNotFound { path, names }) => {
            assert_eq!(path, "repo/f.txt");
            assert_eq!(names, vec!["missing"]);
        }
        other => panic!("expected PropertyNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_set_properties_then_reads_back() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/api/storage/repo/dir"))
        .and(query_param("recursive", "1"))
        .and(query_param("properties", "a=1,2;b=3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/dir"))
        .and(query_param("properties", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "http://localhost/artifactory/api/storage/repo/dir",
            "properties": {"a": ["1", "2"], "b": ["3"]}
        })))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let mut properties = Properties::new();
    properties.insert("a".into(), vec!["1".into(), "2".into()]);
    properties.insert("b".into(), vec!["3".into()]);
    let response = artifactory
        .artifacts
        .set_properties("repo/dir", &properties, true)
        .await
        .expect("set should succeed");

    assert_eq!(response.properties, properties);
}

#[tokio::test]
async fn test_set_properties_400_is_bad_properties() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let mut properties = Properties::new();
    properties.insert("a".into(), vec!["x|y".into()]);
    let result = artifactory
        .artifacts
        .set_properties("repo/dir", &properties, false)
        .await;

    assert!(matches!(result, Err(ArtifactoryError::BadProperties { ref path }) if path == "repo/dir"));
}

#[tokio::test]
async fn test_update_properties_patches_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/artifactory/api/metadata/repo/f.txt"))
        .and(query_param("recursiveProperties", "0"))
        .and(wiremock::matchers::body_json(json!({"props": {"a": ["1"], "old": []}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/f.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "http://localhost/artifactory/api/storage/repo/f.txt",
            "properties": {"a": ["1"]}
        })))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let mut properties = Properties::new();
    properties.insert("a".into(), vec!["1".into()]);
    properties.insert("old".into(), Vec::new());
    let response = artifactory
        .artifacts
        .update_properties("repo/f.txt", &properties, false)
        .await
        .expect("update should succeed");

    assert!(!response.properties.contains_key("old"));
}

#[tokio::test]
async fn test_list_sends_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/dir"))
        .and(query_param("deep", "0"))
        .and(query_param("listFolders", "1"))
        .and(query_param("depth", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "http://localhost/artifactory/api/storage/repo/dir",
            "created": "2024-01-01T00:00:00.000Z",
            "files": [
                {"uri": "/sub", "size": -1, "lastModified": "2024-01-01T00:00:00.000Z", "folder": true},
                {"uri": "/sub/a.txt", "size": "12", "lastModified": "2024-01-01T00:00:00.000Z",
                 "folder": "false", "sha1": "abc", "sha2": "def"}
            ]
        })))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let options = ListOptions {
        recursive: false,
        depth: Some(2),
        list_folders: true,
    };
    let list = artifactory
        .artifacts
        .list("repo/dir", &options)
        .await
        .expect("list should succeed");

    assert_eq!(list.files.len(), 2);
    assert!(list.files[0].is_folder());
    assert_eq!(list.files[1].uri(), "/sub/a.txt");
}

#[tokio::test]
async fn test_stats_decodes_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storage/repo/f.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "http://localhost/artifactory/api/storage/repo/f.txt",
            "downloadCount": 7,
            "lastDownloaded": 1_700_000_000_000_i64,
            "lastDownloadedBy": "alice",
            "remoteDownloadCount": 0,
            "remoteLastDownloaded": 0
        })))
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let stats = artifactory.artifacts.stats("repo/f.txt").await.unwrap();

    assert_eq!(stats.download_count, 7);
    assert_eq!(stats.last_downloaded_by.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_copy_dry_run_then_reads_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/copy/repo/a.txt"))
        .and(query_param("to", "other/b.txt"))
        .and(query_param("dry", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "other/b.txt", file_info("other", "/b.txt", 1)).await;
    let artifactory = client(&server);

    let info = artifactory
        .artifacts
        .copy("repo/a.txt", "/other/b.txt", true)
        .await
        .expect("copy should succeed");

    assert_eq!(info.full_path(), "other/b.txt");
}

#[tokio::test]
async fn test_copy_dry_run_to_missing_destination_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/copy/repo/a.txt"))
        .and(query_param("dry", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    let result = artifactory
        .artifacts
        .copy("repo/a.txt", "other/never.txt", true)
        .await;

    assert!(matches!(
        result,
        Err(ArtifactoryError::NotFound {
            kind: ResourceKind::Artifact,
            ref name
        }) if name == "other/never.txt"
    ));
}

#[tokio::test]
async fn test_move_then_reads_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/move/repo/a.txt"))
        .and(query_param("to", "other/a.txt"))
        .and(query_param("dry", "0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "other/a.txt", file_info("other", "/a.txt", 1)).await;
    let artifactory = client(&server);

    let info = artifactory
        .artifacts
        .move_to("repo/a.txt", "other/a.txt", false)
        .await
        .expect("move should succeed");

    assert_eq!(info.path(), "/a.txt");
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/artifactory/repo/dir"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let artifactory = client(&server);

    artifactory
        .artifacts
        .delete("/repo/dir")
        .await
        .expect("delete should succeed");
}
