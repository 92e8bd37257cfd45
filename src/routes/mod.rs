// ABOUTME: Route module organization for the cleaning business HTTP API
// ABOUTME: Domain route groups plus shared extractors and file response helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Route module for the HTTP API
//!
//! Each domain module exposes a `XRoutes` struct whose `routes` function
//! returns a router bound to the shared [`ServerResources`]. Handlers are
//! thin: authenticate, validate, call the store or a renderer, respond.
//!
//! [`ServerResources`]: crate::resources::ServerResources

/// Floor-area estimation from photos
pub mod area;
/// Bid management
pub mod bids;
/// Calendar invites
pub mod calendar;
/// Client management
pub mod clients;
/// Contract generation and signing
pub mod contracts;
/// E-mail delivery of documents
pub mod email;
/// Estimates and quote calculation
pub mod estimates;
/// Health check and readiness routes
pub mod health;
/// Business profile
pub mod profile;
/// Subscription plans
pub mod subscriptions;

pub use area::AreaRoutes;
pub use bids::BidRoutes;
pub use calendar::CalendarRoutes;
pub use clients::ClientRoutes;
pub use contracts::ContractRoutes;
pub use email::EmailRoutes;
pub use estimates::EstimateRoutes;
pub use health::HealthRoutes;
pub use profile::ProfileRoutes;
pub use subscriptions::SubscriptionRoutes;

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body extractor whose rejections use the standard error envelope
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// MIME type of generated PDFs
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// MIME type of calendar invites
pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Download response with `Content-Disposition: attachment`
pub fn file_response(body: impl Into<Vec<u8>>, content_type: &'static str, filename: &str) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body.into(),
    )
        .into_response()
}

/// `{"status": "..."}` acknowledgement
pub fn status_response(status: &str) -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": status }))).into_response()
}
