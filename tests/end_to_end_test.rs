use cloudprobe::ProbeError;
use cloudprobe::cloud::{CloudStatus, HttpCloudSession};
use cloudprobe::config::CloudConfig;
use cloudprobe::context::TestContext;
use cloudprobe::runner::{RunnerState, TestRunner, TestState};
use cloudprobe::stats::{FileStore, StatsStore};
use cloudprobe::units::Registry;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secret-token";

/// Mount a cloud API that accepts the whole standard sequence.
async fn mount_cloud(server: &MockServer) {
    let download_url = format!("{}/download/a1", server.uri());

    Mock::given(method("GET"))
        .and(path("/freespace"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"freespace": 1_000_000})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "root", "name": "apps"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "f1",
            "name": "__TestFolder__",
            "parentId": "root"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/content"))
        .and(query_param("folderid", "f1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "fileId": "a1",
            "fileName": "image.jpg"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/folders/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f1",
            "name": "__TestFolder__",
            "files": [{
                "id": "a1",
                "name": "image.jpg",
                "type": "PICTURE",
                "downloadUrl": download_url
            }]
        })))
        .expect(2)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/a1/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/folders/f1"))
        .and(body_partial_json(json!({"name": "__TestFolder_2__"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f1",
            "name": "__TestFolder_2__"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/a1"))
        .and(body_partial_json(json!({"parentFolderId": "f1", "clone": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a2",
            "name": "image.jpg",
            "parentId": "f1"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/a1"))
        .and(body_partial_json(json!({"name": "image_2.png"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "name": "image_2.png",
            "downloadUrl": download_url
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "name": "image_2.png",
            "type": "PICTURE",
            "size": 4,
            "creationDate": "2026-01-02T03:04:05Z",
            "downloadUrl": download_url,
            "thumbUrl": format!("{}/thumb/a1", server.uri())
        })))
        .expect(2)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/a1"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/a1/thumbnail"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"thumb".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/files/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/folders/f1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(server)
        .await;
}

fn session_for(server: &MockServer) -> HttpCloudSession {
    HttpCloudSession::new(&CloudConfig {
        base_url: server.uri(),
        token: Some(TOKEN.to_string()),
        ..CloudConfig::default()
    })
    .unwrap()
}

/// 完整流程：连接、建目录、上传、列表、重命名、复制、下载、删除
#[tokio::test]
async fn test_standard_run_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_cloud(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let fixture = temp_dir.path().join("image.jpg");
    fs::write(&fixture, b"\xff\xd8\xff\xe0jpeg").unwrap();
    let stats_dir = temp_dir.path().join("stats");

    let context = TestContext::new(session_for(&mock_server), &fixture);
    let stats = StatsStore::open(FileStore::new(&stats_dir));
    let mut runner = TestRunner::new(Registry::standard(), context, stats);

    let summary = runner.start().await.unwrap();

    let failed: Vec<_> = summary
        .items
        .iter()
        .filter(|i| i.state != TestState::Succeeded)
        .map(|i| i.name.clone())
        .collect();
    assert!(failed.is_empty(), "failed checks: {:?}", failed);
    assert_eq!(summary.passed, 16);
    assert_eq!(runner.state(), RunnerState::Completed);

    // stats were written to disk
    let raw = fs::read_to_string(stats_dir.join("stats.json")).unwrap();
    let persisted: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted["list folder"][1], 2);
    assert_eq!(persisted["connect"][1], 1);
}

#[tokio::test]
async fn test_forbidden_connection_retries_then_aborts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/freespace"))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&mock_server)
        .await;
    // no check may run after a failed connection
    Mock::given(method("GET"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let context = TestContext::new(session_for(&mock_server), temp_dir.path().join("image.jpg"));
    let stats = StatsStore::open(FileStore::new(temp_dir.path()));
    let mut runner = TestRunner::new(Registry::standard(), context, stats);

    let err = runner.start().await.unwrap_err();

    assert!(matches!(
        err,
        ProbeError::Connection(CloudStatus::ForbiddenAccess)
    ));
    assert_eq!(runner.state(), RunnerState::Aborted);
    assert!(runner.items().iter().all(|i| i.state == TestState::Pending));
    assert!(!temp_dir.path().join("stats.json").exists());
}
