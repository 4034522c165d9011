//! HTTP tests against a server bound on an ephemeral port
//!
//! Each test spawns its own server so API-key settings do not leak between
//! tests.

use audiosync_core::audio::signal::{write_wav, NoiseGenerator};
use audiosync_core::SyncProcessor;
use audiosync_server::{AppState, ServerConfig};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;

async fn spawn_server(api_key: Option<&str>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        port: addr.port(),
        bind_addr: "127.0.0.1".to_string(),
        api_key: api_key.map(str::to_string),
    };
    let state = AppState::new(SyncProcessor::default(), config);
    tokio::spawn(async move {
        audiosync_server::serve(listener, state).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Reference noise and a target starting `shift` samples into it
fn write_pair(dir: &Path, shift: usize) -> (PathBuf, PathBuf) {
    let noise = NoiseGenerator::new(1234).samples(8000);
    let reference = dir.join("reference.wav");
    let target = dir.join("target.wav");
    write_wav(&reference, &noise, 1, 8000).unwrap();
    write_wav(&target, &noise[shift..], 1, 8000).unwrap();
    (reference, target)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(Some("secret")).await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "audio-sync-api"}));
}

#[tokio::test]
async fn test_index_lists_formats() {
    let base = spawn_server(None).await;
    let body: Value = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["service"], "Audio Sync API");
    let formats = body["supported_formats"].as_array().unwrap();
    assert_eq!(formats.len(), 6);
    assert!(formats.contains(&json!("wav")));
    assert!(body["endpoints"]["POST /sync"].is_string());
}

#[tokio::test]
async fn test_sync_success() {
    let dir = tempfile::tempdir().unwrap();
    let (reference, target) = write_pair(dir.path(), 800);
    let base = spawn_server(None).await;

    let response = reqwest::Client::new()
        .post(format!("{}/sync", base))
        .json(&json!({
            "reference_file": reference,
            "target_file": target,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let offset = body["offset"].as_f64().unwrap();
    assert!((offset - 0.1).abs() < 1e-9, "offset {}", offset);
}

#[tokio::test]
async fn test_sync_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let (reference, target) = write_pair(dir.path(), 80);
    let base = spawn_server(Some("secret")).await;
    let client = reqwest::Client::new();
    let payload = json!({"reference_file": reference, "target_file": target});

    let missing = client
        .post(format!("{}/sync", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "APIKEY header required");

    let wrong = client
        .post(format!("{}/sync", base))
        .header("APIKEY", "guess")
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(body["error"], "Invalid API key");

    let ok = client
        .post(format!("{}/sync", base))
        .header("APIKEY", "secret")
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    let body: Value = ok.json().await.unwrap();
    assert!((body["offset"].as_f64().unwrap() - 0.01).abs() < 1e-9);
}

#[tokio::test]
async fn test_sync_bad_payloads() {
    let base = spawn_server(None).await;
    let client = reqwest::Client::new();

    let not_json = client
        .post(format!("{}/sync", base))
        .body("reference_file=a.wav")
        .send()
        .await
        .unwrap();
    assert_eq!(not_json.status(), 400);
    let body: Value = not_json.json().await.unwrap();
    assert_eq!(body["error"], "JSON payload required");

    let missing_field = client
        .post(format!("{}/sync", base))
        .json(&json!({"reference_file": "/tmp/a.wav"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_field.status(), 400);
    let body: Value = missing_field.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Both reference_file and target_file are required"
    );
}

#[tokio::test]
async fn test_sync_missing_file_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (reference, _) = write_pair(dir.path(), 0);
    let base = spawn_server(None).await;

    let response = reqwest::Client::new()
        .post(format!("{}/sync", base))
        .json(&json!({
            "reference_file": reference,
            "target_file": dir.path().join("absent.wav"),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("File not found"));
    assert!(body.get("success").is_none());
}

#[tokio::test]
async fn test_sync_decode_failure_reports_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let (reference, _) = write_pair(dir.path(), 0);
    let broken = dir.path().join("broken.flac");
    std::fs::write(&broken, b"garbage").unwrap();
    let base = spawn_server(None).await;

    let response = reqwest::Client::new()
        .post(format!("{}/sync", base))
        .json(&json!({"reference_file": reference, "target_file": broken}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}
