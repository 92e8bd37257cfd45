// ABOUTME: E-mail routes for sending estimates and contracts to clients
// ABOUTME: Renders the PDF, delivers it through the mailer and records the send per bid
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::contracts::{load_contract_parts, render_and_store_contract};
use super::status_response;
use crate::constants::documents as text;
use crate::documents::render_estimate;
use crate::email::{EmailAttachment, OutgoingEmail};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{is_valid_email, AttachmentKind, EmailLogEntry};
use crate::resources::ServerResources;
use crate::uploads::{contract_file_name, estimate_file_name, MultipartForm};

/// E-mails sent for a bid
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Oldest first
    pub messages: Vec<EmailLogEntry>,
}

fn recipient(form: &MultipartForm) -> AppResult<String> {
    let to = form.required("to")?;
    if is_valid_email(to) {
        Ok(to.to_owned())
    } else {
        Err(AppError::invalid_format("to", "not a valid e-mail address"))
    }
}

/// Send a document and record it in the bid's e-mail log
async fn deliver(
    resources: &ServerResources,
    owner_id: &str,
    bid_id: &str,
    email: OutgoingEmail,
    kind: AttachmentKind,
) -> AppResult<()> {
    let mailer = resources.mailer()?;
    let to = email.to.clone();

    if let Err(error) = mailer.send(email).await {
        AppLogger::log_email_event(owner_id, bid_id, kind.as_str(), false);
        AppLogger::log_failure(owner_id, "email_send", &error);
        return Err(error.with_user_id(owner_id).with_resource_id(bid_id));
    }

    resources
        .store
        .append_email(
            owner_id,
            bid_id,
            EmailLogEntry {
                timestamp: Utc::now(),
                to,
                attachment: kind,
            },
        )
        .await;
    AppLogger::log_email_event(owner_id, bid_id, kind.as_str(), true);
    Ok(())
}

/// E-mail routes
pub struct EmailRoutes;

impl EmailRoutes {
    /// Create all e-mail routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/email-estimate/:bid_id", post(Self::handle_email_estimate))
            .route(
                "/email-contract/:client_id/:bid_id",
                post(Self::handle_email_contract),
            )
            .route("/bids/:bid_id/messages", get(Self::handle_messages))
            .with_state(resources)
    }

    async fn handle_email_estimate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let to = recipient(&form?)?;
        resources.mailer()?;

        let bid = resources
            .store
            .find_bid(&user.uid, &bid_id)
            .await
            .ok_or_else(|| AppError::not_found("Bid").with_resource_id(&bid_id))?;
        let business = resources
            .store
            .get_profile(&user.uid)
            .await
            .ok_or_else(|| AppError::invalid_input("Business profile missing"))?;
        let quote = bid
            .quote_data
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("Quote missing").with_resource_id(&bid_id))?;

        let file_name = estimate_file_name(&bid_id);
        let pdf = render_estimate(&business, quote);
        resources.uploads.write_named(&file_name, &pdf).await?;

        let email = OutgoingEmail {
            to,
            subject: text::ESTIMATE_EMAIL_SUBJECT.to_owned(),
            body: text::ESTIMATE_EMAIL_BODY.to_owned(),
            attachment: Some(EmailAttachment::pdf(file_name, pdf)),
        };
        deliver(&resources, &user.uid, &bid_id, email, AttachmentKind::Estimate).await?;
        Ok(status_response("estimate emailed"))
    }

    async fn handle_email_contract(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((client_id, bid_id)): Path<(String, String)>,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let to = recipient(&form?)?;
        resources.mailer()?;

        let parts = load_contract_parts(&resources, &user.uid, &client_id, &bid_id).await?;
        let pdf = render_and_store_contract(&resources, &parts).await?;

        let email = OutgoingEmail {
            to,
            subject: text::CONTRACT_EMAIL_SUBJECT.to_owned(),
            body: text::CONTRACT_EMAIL_BODY.to_owned(),
            attachment: Some(EmailAttachment::pdf(contract_file_name(&bid_id), pdf)),
        };
        deliver(&resources, &user.uid, &bid_id, email, AttachmentKind::Contract).await?;
        Ok(status_response("contract emailed"))
    }

    async fn handle_messages(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bid_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let messages = resources.store.list_emails(&user.uid, &bid_id).await;
        Ok((StatusCode::OK, Json(MessagesResponse { messages })).into_response())
    }
}
