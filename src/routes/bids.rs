// ABOUTME: Bid management routes
// ABOUTME: Create bids with photos and an optional quote, list, fetch and delete them
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status_response;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::Bid;
use crate::quote::{calculate_quote, Quote, QuoteRequest};
use crate::resources::ServerResources;
use crate::uploads::{contract_file_name, estimate_file_name, signature_file_name, MultipartForm};

/// Query parameters for listing bids
#[derive(Debug, Default, Deserialize)]
pub struct ListBidsQuery {
    /// Only bids for this client
    pub client: Option<String>,
}

/// Response for a saved bid
#[derive(Debug, Serialize, Deserialize)]
pub struct BidSavedResponse {
    /// Always `bid saved`
    pub status: String,
    /// The stored bid
    pub bid: Bid,
    /// Map search link for the bid address
    pub maps_link: String,
}

/// Quote inputs sent alongside a bid; `None` when no square footage was given
fn quote_from_form(form: &MultipartForm) -> AppResult<Option<Quote>> {
    let square_footage = match form.parse_optional::<f64>("total_sqft")? {
        Some(value) => value,
        None => match form.parse_optional::<f64>("square_footage")? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let request = QuoteRequest {
        square_footage,
        num_pets: form.parse_optional("num_pets")?.unwrap_or_default(),
        num_windows: form.parse_optional("num_windows")?.unwrap_or_default(),
        windows_outside: form.flag("windows_outside")?,
        cleanliness: form.parse_optional("cleanliness")?.unwrap_or_default(),
        travel_miles: form.parse_optional("travel_miles")?.unwrap_or_default(),
        state: form.optional("state").unwrap_or_default().to_owned(),
        knickknack: form.parse_optional("knickknack")?.unwrap_or_default(),
        floor_carpet: form.flag("floor_carpet")?,
        floor_hardwood: form.flag("floor_hardwood")?,
        floor_tile: form.flag("floor_tile")?,
        floor_laminate: form.flag("floor_laminate")?,
    };
    request.validate()?;
    Ok(Some(calculate_quote(&request)))
}

/// Bid routes
pub struct BidRoutes;

impl BidRoutes {
    /// Create all bid routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/bid", post(Self::handle_create))
            .route("/bids", get(Self::handle_list))
            .route("/bids/:bid_id", get(Self::handle_get))
            .route("/bid/:bid_id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;

        let client_id = form.required("client_id")?;
        if resources
            .store
            .find_client(&user.uid, client_id)
            .await
            .is_none()
        {
            return Err(AppError::not_found("Client").with_resource_id(client_id));
        }
        let bid_address = form.required("bid_address")?.to_owned();
        let quote_data = quote_from_form(&form)?;

        let before_photos = resources
            .uploads
            .save_uploads("before", form.files("before_photos"))
            .await?;
        let after_photos = resources
            .uploads
            .save_uploads("after", form.files("after_photos"))
            .await?;

        let bid = Bid {
            bid_id: Uuid::new_v4().to_string(),
            owner_id: user.uid.clone(),
            client_id: client_id.to_owned(),
            bid_address,
            notes: form.optional("notes").unwrap_or_default().to_owned(),
            before_photos,
            after_photos,
            quote_data,
            signed_contract: None,
            created_at: Utc::now(),
        };

        resources.store.add_bid(bid.clone()).await;
        AppLogger::log_event(&user.uid, "bid_created", Some(&bid.bid_id));

        let maps_link = bid.maps_link();
        Ok((
            StatusCode::OK,
            Json(BidSavedResponse {
                status: "bid saved".to_owned(),
                bid,
                maps_link,
            }),
        )
            .into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListBidsQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let client = query.client.as_deref().filter(|id| !id.is_empty());
        let bids = resources.store.list_bids(&user.uid, client).await;
        Ok((StatusCode::OK, Json(bids)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let bid = resources
            .store
            .find_bid(&user.uid, &bid_id)
            .await
            .ok_or_else(|| AppError::not_found("Bid").with_resource_id(&bid_id))?;
        Ok((StatusCode::OK, Json(bid)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        if resources.store.delete_bid(&user.uid, &bid_id).await {
            for name in [
                estimate_file_name(&bid_id),
                contract_file_name(&bid_id),
                signature_file_name(&bid_id),
            ] {
                resources.uploads.remove_named(&name).await?;
            }
            AppLogger::log_event(&user.uid, "bid_deleted", Some(&bid_id));
        }
        Ok(status_response("bid deleted"))
    }
}
