// ABOUTME: Contract routes
// ABOUTME: Generate the contract PDF, record a client's signature and clear it again
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use tokio::fs;
use tracing::warn;

use super::{file_response, status_response, PDF_CONTENT_TYPE};
use crate::documents::pdf::PdfImage;
use crate::documents::render_contract;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Bid, BusinessProfile, Client, SignedContract};
use crate::resources::ServerResources;
use crate::uploads::{contract_file_name, signature_file_name, MultipartForm};

/// File name offered to the browser
const CONTRACT_DOWNLOAD_NAME: &str = "contract.pdf";

/// Everything a contract document needs
pub(crate) struct ContractParts {
    pub business: BusinessProfile,
    pub client: Client,
    pub bid: Bid,
}

/// Load client, bid and profile; each missing record is a 404
pub(crate) async fn load_contract_parts(
    resources: &ServerResources,
    owner_id: &str,
    client_id: &str,
    bid_id: &str,
) -> AppResult<ContractParts> {
    let client = resources
        .store
        .find_client(owner_id, client_id)
        .await
        .ok_or_else(|| AppError::not_found("Client").with_resource_id(client_id))?;
    let bid = resources
        .store
        .find_bid(owner_id, bid_id)
        .await
        .ok_or_else(|| AppError::not_found("Bid").with_resource_id(bid_id))?;
    let business = resources
        .store
        .get_profile(owner_id)
        .await
        .ok_or_else(|| AppError::not_found("Business profile"))?;
    Ok(ContractParts {
        business,
        client,
        bid,
    })
}

/// Render a contract and store it as the bid's contract PDF
pub(crate) async fn render_and_store_contract(
    resources: &ServerResources,
    parts: &ContractParts,
) -> AppResult<Vec<u8>> {
    let quote = parts
        .bid
        .quote_data
        .as_ref()
        .ok_or_else(|| AppError::invalid_input("Quote missing").with_resource_id(&parts.bid.bid_id))?;
    let signature = match &parts.bid.signed_contract {
        Some(signed) => load_signature(&signed.signature_path).await,
        None => None,
    };
    let pdf = render_contract(
        &parts.business,
        &parts.client,
        &parts.bid,
        quote,
        signature.as_ref(),
    );
    resources
        .uploads
        .write_named(&contract_file_name(&parts.bid.bid_id), &pdf)
        .await?;
    Ok(pdf)
}

/// Decode a stored signature; a missing or unreadable image is left out
async fn load_signature(path: &str) -> Option<PdfImage> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path, error = %e, "Signature image unavailable");
            return None;
        }
    };
    match tokio::task::spawn_blocking(move || PdfImage::decode(&bytes)).await {
        Ok(Ok(image)) => Some(image),
        Ok(Err(e)) => {
            warn!(path = %path, error = %e, "Signature image could not be decoded");
            None
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Signature decoding task failed");
            None
        }
    }
}

/// Contract routes
pub struct ContractRoutes;

impl ContractRoutes {
    /// Create all contract routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/generate-contract/:client_id/:bid_id",
                get(Self::handle_generate),
            )
            .route("/sign-contract/:client_id/:bid_id", post(Self::handle_sign))
            .route("/contract/:bid_id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((client_id, bid_id)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let parts = load_contract_parts(&resources, &user.uid, &client_id, &bid_id).await?;
        let pdf = render_and_store_contract(&resources, &parts).await?;
        AppLogger::log_event(&user.uid, "contract_generated", Some(&bid_id));
        Ok(file_response(pdf, PDF_CONTENT_TYPE, CONTRACT_DOWNLOAD_NAME))
    }

    async fn handle_sign(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((client_id, bid_id)): Path<(String, String)>,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;

        let name = form.required("name")?.to_owned();
        let signature = form
            .file("signature")
            .ok_or_else(|| AppError::missing_field("signature"))?;

        let bid = resources
            .store
            .find_bid(&user.uid, &bid_id)
            .await
            .filter(|bid| bid.client_id == client_id)
            .ok_or_else(|| AppError::not_found("Bid").with_resource_id(&bid_id))?;

        let signature_path = resources
            .uploads
            .write_named(&signature_file_name(&bid.bid_id), &signature.bytes)
            .await?;

        let signed = SignedContract {
            name,
            timestamp: Utc::now(),
            signature_path,
        };
        resources
            .store
            .update_bid(&user.uid, &bid_id, |bid| bid.signed_contract = Some(signed))
            .await
            .ok_or_else(|| AppError::not_found("Bid").with_resource_id(&bid_id))?;

        AppLogger::log_event(&user.uid, "contract_signed", Some(&bid_id));
        Ok(status_response("signed"))
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let cleared = resources
            .store
            .update_bid(&user.uid, &bid_id, |bid| bid.signed_contract = None)
            .await;
        if cleared.is_some() {
            resources
                .uploads
                .remove_named(&contract_file_name(&bid_id))
                .await?;
            resources
                .uploads
                .remove_named(&signature_file_name(&bid_id))
                .await?;
            AppLogger::log_event(&user.uid, "contract_deleted", Some(&bid_id));
        }
        Ok(status_response("contract deleted"))
    }
}
