// ABOUTME: Fake integrations and fixtures for route tests
// ABOUTME: Token verifier keyed on "token-<uid>", recording mailer, temp upload dirs and seeded records

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use cleaners_assistant::auth::{AuthenticatedUser, TokenVerifier};
use cleaners_assistant::config::environment::ServerConfig;
use cleaners_assistant::email::{Mailer, OutgoingEmail};
use cleaners_assistant::errors::{AppError, AppResult};
use cleaners_assistant::resources::ServerResources;
use cleaners_assistant::server::build_router;
use image::{GrayImage, ImageFormat, Luma};
use tempfile::TempDir;

use super::axum_test::AxumTestRequest;

/// Accepts `token-<uid>`; `expired` is reported as expired, anything else as invalid
pub struct FakeVerifier;

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser> {
        if token == "expired" {
            return Err(AppError::auth_expired());
        }
        token
            .strip_prefix("token-")
            .filter(|uid| !uid.is_empty())
            .map(|uid| AuthenticatedUser {
                uid: uid.to_owned(),
                email: Some(format!("{uid}@example.com")),
                provider: Some("password".to_owned()),
            })
            .ok_or_else(|| AppError::auth_invalid("Invalid token"))
    }
}

/// Mailer that keeps every message in memory
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose sends always fail
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        if self.fail {
            return Err(AppError::external_service("SMTP", "connection refused"));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// A router over fresh resources with a temporary upload directory
pub struct TestApp {
    pub resources: Arc<ServerResources>,
    pub mailer: Option<Arc<RecordingMailer>>,
    pub uploads: TempDir,
}

impl TestApp {
    /// App with a working mailer
    pub fn new() -> Self {
        Self::with_mailer(Some(Arc::new(RecordingMailer::default())))
    }

    /// App without SMTP configured
    pub fn without_mailer() -> Self {
        Self::with_mailer(None)
    }

    /// App with the given mailer
    pub fn with_mailer(mailer: Option<Arc<RecordingMailer>>) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.uploads.directory = uploads.path().to_path_buf();

        let resources = ServerResources::new(
            config,
            Arc::new(FakeVerifier),
            mailer.clone().map(|m| m as Arc<dyn Mailer>),
        );
        Self {
            resources: Arc::new(resources),
            mailer,
            uploads,
        }
    }

    /// Full router, including middleware
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.resources))
    }

    /// Messages the recording mailer has sent
    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.mailer.as_ref().map(|m| m.sent()).unwrap_or_default()
    }

    /// Create a client and return its ID
    pub async fn create_client(&self, uid: &str, name: &str, frequency: &str) -> String {
        let response = AxumTestRequest::post("/client")
            .auth(uid)
            .field("name", name)
            .field("contact_email", "client@example.com")
            .field("contact_number", "555-0100")
            .field("cleaning_frequency", frequency)
            .send(self.router())
            .await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json();
        body["client"]["client_id"].as_str().unwrap().to_owned()
    }

    /// Save a business profile for `uid`
    pub async fn create_profile(&self, uid: &str) {
        let response = AxumTestRequest::post("/profile")
            .auth(uid)
            .field("business_name", "Sparkle Co")
            .field("business_address", "1 Main St, Springfield")
            .field("contact_email", "owner@sparkle.example")
            .field("contact_number", "555-0199")
            .send(self.router())
            .await;
        assert_eq!(response.status(), 200);
    }

    /// Create a 2000 sqft California bid and return its ID
    pub async fn create_bid(&self, uid: &str, client_id: &str) -> String {
        let response = AxumTestRequest::post("/bid")
            .auth(uid)
            .field("client_id", client_id)
            .field("bid_address", "42 Elm St, Springfield")
            .field("notes", "Two dogs")
            .field("total_sqft", "2000")
            .field("state", "CA")
            .send(self.router())
            .await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json();
        body["bid"]["bid_id"].as_str().unwrap().to_owned()
    }

    /// Client, profile and priced bid for `uid`; returns `(client_id, bid_id)`
    pub async fn seed_contract(&self, uid: &str, frequency: &str) -> (String, String) {
        self.create_profile(uid).await;
        let client_id = self.create_client(uid, "Jordan Lee", frequency).await;
        let bid_id = self.create_bid(uid, &client_id).await;
        (client_id, bid_id)
    }
}

/// PNG with a white rectangle on black
pub fn rectangle_png(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> Vec<u8> {
    let (rx, ry, rw, rh) = rect;
    let image = GrayImage::from_fn(width, height, |x, y| {
        if (rx..rx + rw).contains(&x) && (ry..ry + rh).contains(&y) {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
