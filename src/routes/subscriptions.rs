// ABOUTME: Subscription plan routes
// ABOUTME: Set and read the caller's plan tier
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::models::SubscriptionTier;
use crate::resources::ServerResources;
use crate::uploads::MultipartForm;

/// Response after changing plans
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionUpdatedResponse {
    /// Always `subscription updated`
    pub status: String,
    /// New plan
    pub level: SubscriptionTier,
}

/// Current plan
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Plan, `free` when never set
    pub subscription: SubscriptionTier,
}

/// Subscription routes
pub struct SubscriptionRoutes;

impl SubscriptionRoutes {
    /// Create all subscription routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/set-subscription", post(Self::handle_set))
            .route("/subscriptions", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_set(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;
        let level: SubscriptionTier = form.required("level")?.parse()?;

        resources.store.set_subscription(&user.uid, level).await;
        AppLogger::log_event(&user.uid, "subscription_updated", Some(level.as_str()));

        Ok((
            StatusCode::OK,
            Json(SubscriptionUpdatedResponse {
                status: "subscription updated".to_owned(),
                level,
            }),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let subscription = resources.store.get_subscription(&user.uid).await;
        Ok((StatusCode::OK, Json(SubscriptionResponse { subscription })).into_response())
    }
}
