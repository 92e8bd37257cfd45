// ABOUTME: Route tests for client and business profile management
// ABOUTME: Covers authentication, validation, owner isolation and profile image handling
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{rectangle_png, TestApp};
use serde_json::Value;

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new();

    let response = AxumTestRequest::get("/clients").send(app.router()).await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_code(), "AUTH_REQUIRED");

    let response = AxumTestRequest::get("/clients")
        .header("authorization", "Bearer nonsense")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_code(), "AUTH_INVALID");

    let response = AxumTestRequest::get("/clients")
        .header("authorization", "Bearer expired")
        .send(app.router())
        .await;
    assert_eq!(response.error_code(), "AUTH_EXPIRED");
}

#[tokio::test]
async fn test_auth_is_checked_before_form_parsing() {
    let app = TestApp::new();
    let response = AxumTestRequest::post("/client")
        .header("content-type", "text/plain")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_create_and_list_clients() {
    let app = TestApp::new();

    let response = AxumTestRequest::post("/client")
        .auth("owner-a")
        .field("name", "Jordan Lee")
        .field("contact_email", "jordan@example.com")
        .field("contact_number", "555-0100")
        .field("cleaning_frequency", "weekly")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "client added");
    assert_eq!(body["client"]["name"], "Jordan Lee");
    assert_eq!(body["client"]["cleaning_frequency"], "weekly");
    assert_eq!(body["client"]["owner_id"], "owner-a");

    let clients: Vec<Value> = AxumTestRequest::get("/clients")
        .auth("owner-a")
        .send(app.router())
        .await
        .json();
    assert_eq!(clients.len(), 1);

    let others: Vec<Value> = AxumTestRequest::get("/clients")
        .auth("owner-b")
        .send(app.router())
        .await
        .json();
    assert!(others.is_empty());
}

#[tokio::test]
async fn test_create_client_validation() {
    let app = TestApp::new();

    let response = AxumTestRequest::post("/client")
        .auth("owner-a")
        .field("name", "Jordan Lee")
        .field("contact_email", "jordan@example.com")
        .field("contact_number", "555-0100")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_code(), "MISSING_REQUIRED_FIELD");

    let response = AxumTestRequest::post("/client")
        .auth("owner-a")
        .field("name", "Jordan Lee")
        .field("contact_email", "not-an-email")
        .field("contact_number", "555-0100")
        .field("cleaning_frequency", "weekly")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_code(), "INVALID_FORMAT");

    let response = AxumTestRequest::post("/client")
        .auth("owner-a")
        .field("name", "Jordan Lee")
        .field("contact_email", "jordan@example.com")
        .field("contact_number", "555-0100")
        .field("cleaning_frequency", "daily")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_delete_client_is_owner_scoped() {
    let app = TestApp::new();
    let client_id = app.create_client("owner-a", "Jordan Lee", "single").await;

    let response = AxumTestRequest::delete(&format!("/client/{client_id}"))
        .auth("owner-b")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(app.resources.store.list_clients("owner-a").await.len(), 1);

    let response = AxumTestRequest::delete(&format!("/client/{client_id}"))
        .auth("owner-a")
        .send(app.router())
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "client deleted");
    assert!(app.resources.store.list_clients("owner-a").await.is_empty());
}

#[tokio::test]
async fn test_profile_lifecycle() {
    let app = TestApp::new();

    let response = AxumTestRequest::get("/profile")
        .auth("owner-a")
        .send(app.router())
        .await;
    assert_eq!(response.status(), 404);

    let logo = rectangle_png(10, 10, (2, 2, 5, 5));
    let response = AxumTestRequest::post("/profile")
        .auth("owner-a")
        .field("business_name", "Sparkle Co")
        .field("business_address", "1 Main St")
        .field("contact_email", "owner@sparkle.example")
        .field("contact_number", "555-0199")
        .field("owner_name", "Sam Rivera")
        .file("logo", "logo.png", "image/png", &logo)
        .send(app.router())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "saved");
    let logo_url = body["profile"]["logo_url"].as_str().unwrap().to_owned();
    assert!(logo_url.contains("logo_"));
    assert!(std::path::Path::new(&logo_url).exists());

    let response = AxumTestRequest::put("/profile")
        .auth("owner-a")
        .field("business_name", "Sparkle & Shine")
        .field("business_address", "2 Main St")
        .field("contact_email", "owner@sparkle.example")
        .field("contact_number", "555-0199")
        .send(app.router())
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "profile updated");
    assert_eq!(body["profile"]["business_name"], "Sparkle & Shine");
    assert_eq!(body["profile"]["logo_url"], logo_url.as_str());
    assert_eq!(body["profile"]["owner_name"], "Sam Rivera");

    let profile: Value = AxumTestRequest::get("/profile")
        .auth("owner-a")
        .send(app.router())
        .await
        .json();
    assert_eq!(profile["business_address"], "2 Main St");
}
