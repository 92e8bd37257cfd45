// ABOUTME: Tests for health routes and router-wide middleware
// ABOUTME: Request ID propagation, CORS preflight and upload size limits

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use cleaners_assistant::config::environment::ServerConfig;
use cleaners_assistant::resources::ServerResources;
use cleaners_assistant::server::build_router;
use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{FakeVerifier, TestApp};
use serde_json::Value;

#[tokio::test]
async fn test_health_and_ready() {
    let app = TestApp::new();
    let body: Value = AxumTestRequest::get("/health")
        .send(app.router())
        .await
        .json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "cleaners-assistant");

    let response = AxumTestRequest::get("/ready").send(app.router()).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = TestApp::new();
    let response = AxumTestRequest::get("/health").send(app.router()).await;
    let id = response.header("x-request-id").unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "client-trace-42")
        .send(app.router())
        .await;
    assert_eq!(response.header("x-request-id"), Some("client-trace-42"));

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "bad id with spaces")
        .send(app.router())
        .await;
    assert_ne!(response.header("x-request-id"), Some("bad id with spaces"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new();
    let response = AxumTestRequest::options("/clients")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "GET")
        .send(app.router())
        .await;
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.uploads.directory = uploads.path().to_path_buf();
    config.uploads.max_upload_bytes = 1024;
    let resources = Arc::new(ServerResources::new(config, Arc::new(FakeVerifier), None));

    let response = AxumTestRequest::post("/set-subscription")
        .auth("owner-a")
        .field("level", "pro")
        .file("padding", "big.bin", "application/octet-stream", &vec![0_u8; 4096])
        .send(build_router(resources))
        .await;
    assert_eq!(response.status(), 413);
}
