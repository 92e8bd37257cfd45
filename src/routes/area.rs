// ABOUTME: Photo-based floor area estimation route, gated to paid plans
// ABOUTME: Stores the uploaded photo and runs edge detection off the async runtime
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::require_tier;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::models::SubscriptionTier;
use crate::resources::ServerResources;
use crate::uploads::MultipartForm;

/// Area estimate result
#[derive(Debug, Serialize, Deserialize)]
pub struct AreaEstimateResponse {
    /// Square feet, rounded to 2 decimals
    pub estimated_area_sqft: f64,
    /// Plan the caller is on
    pub plan: SubscriptionTier,
}

/// Area estimation routes
pub struct AreaRoutes;

impl AreaRoutes {
    /// Create all area routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/estimate-area", post(Self::handle_estimate_area))
            .with_state(resources)
    }

    async fn handle_estimate_area(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let plan = resources.store.get_subscription(&user.uid).await;
        require_tier(plan, SubscriptionTier::Pro).map_err(|e| e.with_user_id(&user.uid))?;

        let form = form?;
        let photo = form
            .file("photo")
            .ok_or_else(|| AppError::missing_field("photo"))?;
        resources.uploads.save_upload("area", photo).await?;

        let estimator = resources.area_estimator;
        let bytes = photo.bytes.clone();
        let estimated_area_sqft = tokio::task::spawn_blocking(move || estimator.estimate(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("Area estimation task failed: {e}")))??;

        AppLogger::log_event(
            &user.uid,
            "area_estimated",
            Some(&estimated_area_sqft.to_string()),
        );
        Ok((
            StatusCode::OK,
            Json(AreaEstimateResponse {
                estimated_area_sqft,
                plan,
            }),
        )
            .into_response())
    }
}
