// ABOUTME: Quote calculation and estimate PDF routes
// ABOUTME: Ad-hoc quotes, estimate PDFs for ad-hoc input or stored bids, and estimate removal
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{file_response, status_response, AppJson, PDF_CONTENT_TYPE};
use crate::documents::render_estimate;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::quote::{calculate_quote, Quote, QuoteRequest};
use crate::resources::ServerResources;
use crate::uploads::estimate_file_name;

/// File name offered to the browser
const ESTIMATE_DOWNLOAD_NAME: &str = "estimate.pdf";

/// Response for an ad-hoc quote
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Always `ok`
    pub status: String,
    /// The computed quote
    pub quote: Quote,
}

/// Estimate routes
pub struct EstimateRoutes;

impl EstimateRoutes {
    /// Create all estimate routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/calculate-quote", post(Self::handle_calculate))
            .route("/generate-estimate", post(Self::handle_generate))
            .route("/generate-estimate/:bid_id", post(Self::handle_generate_for_bid))
            .route("/estimate/:bid_id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_calculate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<AppJson<QuoteRequest>, AppError>,
    ) -> Result<Response, AppError> {
        resources.authenticate(&headers).await?;
        let AppJson(request) = body?;
        request.validate()?;

        let quote = calculate_quote(&request);
        Ok((
            StatusCode::OK,
            Json(QuoteResponse {
                status: "ok".to_owned(),
                quote,
            }),
        )
            .into_response())
    }

    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<AppJson<QuoteRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let AppJson(request) = body?;
        request.validate()?;

        let business = resources
            .store
            .get_profile(&user.uid)
            .await
            .ok_or_else(|| AppError::invalid_input("Business profile missing"))?;

        let pdf = render_estimate(&business, &calculate_quote(&request));
        AppLogger::log_event(&user.uid, "estimate_generated", None);
        Ok(file_response(pdf, PDF_CONTENT_TYPE, ESTIMATE_DOWNLOAD_NAME))
    }

    async fn handle_generate_for_bid(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;

        let bid = resources.store.find_bid(&user.uid, &bid_id).await;
        let business = resources.store.get_profile(&user.uid).await;
        let (Some(bid), Some(business)) = (bid, business) else {
            return Err(AppError::invalid_input("Bid or business not found").with_resource_id(bid_id));
        };
        let quote = bid
            .quote_data
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("Quote missing").with_resource_id(&bid_id))?;

        let pdf = render_estimate(&business, quote);
        resources
            .uploads
            .write_named(&estimate_file_name(&bid_id), &pdf)
            .await?;
        AppLogger::log_event(&user.uid, "estimate_generated", Some(&bid_id));
        Ok(file_response(pdf, PDF_CONTENT_TYPE, ESTIMATE_DOWNLOAD_NAME))
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        // Stored files are only touched for bids the caller owns
        if resources.store.find_bid(&user.uid, &bid_id).await.is_some()
            && resources
                .uploads
                .remove_named(&estimate_file_name(&bid_id))
                .await?
        {
            AppLogger::log_event(&user.uid, "estimate_deleted", Some(&bid_id));
        }
        Ok(status_response("estimate deleted"))
    }
}
