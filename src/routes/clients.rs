// ABOUTME: Client management routes
// ABOUTME: Create, list and delete the caller's clients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status_response;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::models::{is_valid_email, CleaningFrequency, Client};
use crate::resources::ServerResources;
use crate::uploads::MultipartForm;

/// Response for a created client
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientCreatedResponse {
    /// Always `client added`
    pub status: String,
    /// The stored client
    pub client: Client,
}

/// Client routes
pub struct ClientRoutes;

impl ClientRoutes {
    /// Create all client routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/client", post(Self::handle_create))
            .route("/clients", get(Self::handle_list))
            .route("/client/:client_id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;

        let contact_email = form.required("contact_email")?;
        if !is_valid_email(contact_email) {
            return Err(AppError::invalid_format(
                "contact_email",
                "not a valid e-mail address",
            ));
        }

        let client = Client {
            client_id: Uuid::new_v4().to_string(),
            owner_id: user.uid.clone(),
            name: form.required("name")?.to_owned(),
            contact_email: contact_email.to_owned(),
            contact_number: form.required("contact_number")?.to_owned(),
            cleaning_frequency: form.parse_required::<CleaningFrequency>("cleaning_frequency")?,
        };

        resources.store.add_client(client.clone()).await;
        AppLogger::log_event(&user.uid, "client_created", Some(&client.client_id));

        Ok((
            StatusCode::OK,
            Json(ClientCreatedResponse {
                status: "client added".to_owned(),
                client,
            }),
        )
            .into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let clients = resources.store.list_clients(&user.uid).await;
        Ok((StatusCode::OK, Json(clients)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        if resources.store.delete_client(&user.uid, &client_id).await {
            AppLogger::log_event(&user.uid, "client_deleted", Some(&client_id));
        }
        Ok(status_response("client deleted"))
    }
}
