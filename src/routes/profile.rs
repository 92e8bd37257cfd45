// ABOUTME: Business profile routes
// ABOUTME: Save, fetch and update the caller's business details and branding images
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{is_valid_email, BusinessProfile};
use crate::resources::ServerResources;
use crate::uploads::{MultipartForm, UploadStore};

/// Response carrying a stored profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// `saved` or `profile updated`
    pub status: String,
    /// The stored profile
    pub profile: BusinessProfile,
}

/// Branding images accepted with a profile, with their storage prefixes
const IMAGE_FIELDS: [(&str, &str); 3] = [("logo", "logo"), ("qr_venmo", "venmo"), ("qr_paypal", "paypal")];

/// Paths of newly uploaded branding images, `None` where no file was sent
struct BrandingUploads {
    logo_url: Option<String>,
    qr_venmo_url: Option<String>,
    qr_paypal_url: Option<String>,
}

async fn save_branding(form: &MultipartForm, uploads: &UploadStore) -> AppResult<BrandingUploads> {
    let mut saved = [None, None, None];
    for (slot, (field, prefix)) in saved.iter_mut().zip(IMAGE_FIELDS) {
        if let Some(file) = form.file(field) {
            *slot = Some(uploads.save_upload(prefix, file).await?);
        }
    }
    let [logo_url, qr_venmo_url, qr_paypal_url] = saved;
    Ok(BrandingUploads {
        logo_url,
        qr_venmo_url,
        qr_paypal_url,
    })
}

fn required_contact_email(form: &MultipartForm) -> AppResult<String> {
    let email = form.required("contact_email")?;
    if is_valid_email(email) {
        Ok(email.to_owned())
    } else {
        Err(AppError::invalid_format(
            "contact_email",
            "not a valid e-mail address",
        ))
    }
}

/// Business profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/profile",
                get(Self::handle_get)
                    .post(Self::handle_save)
                    .put(Self::handle_update),
            )
            .with_state(resources)
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;

        let business_name = form.required("business_name")?.to_owned();
        let business_address = form.required("business_address")?.to_owned();
        let contact_email = required_contact_email(&form)?;
        let contact_number = form.required("contact_number")?.to_owned();
        let branding = save_branding(&form, &resources.uploads).await?;

        let profile = BusinessProfile {
            owner_id: user.uid.clone(),
            owner_name: form.optional("owner_name").map(str::to_owned),
            business_name,
            business_address,
            contact_email,
            contact_number,
            logo_url: branding.logo_url,
            qr_venmo_url: branding.qr_venmo_url,
            qr_paypal_url: branding.qr_paypal_url,
        };

        resources.store.save_profile(profile.clone()).await;
        AppLogger::log_event(&user.uid, "profile_saved", None);

        Ok((
            StatusCode::OK,
            Json(ProfileResponse {
                status: "saved".to_owned(),
                profile,
            }),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let profile = resources
            .store
            .get_profile(&user.uid)
            .await
            .ok_or_else(|| AppError::not_found("Profile"))?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<MultipartForm, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let form = form?;

        let business_name = form.required("business_name")?.to_owned();
        let business_address = form.required("business_address")?.to_owned();
        let contact_email = required_contact_email(&form)?;
        let contact_number = form.required("contact_number")?.to_owned();
        let branding = save_branding(&form, &resources.uploads).await?;

        let previous = resources
            .store
            .get_profile(&user.uid)
            .await
            .unwrap_or_default();

        let profile = BusinessProfile {
            owner_id: user.uid.clone(),
            owner_name: form
                .optional("owner_name")
                .map(str::to_owned)
                .or(previous.owner_name),
            business_name,
            business_address,
            contact_email,
            contact_number,
            logo_url: branding.logo_url.or(previous.logo_url),
            qr_venmo_url: branding.qr_venmo_url.or(previous.qr_venmo_url),
            qr_paypal_url: branding.qr_paypal_url.or(previous.qr_paypal_url),
        };

        resources.store.save_profile(profile.clone()).await;
        AppLogger::log_event(&user.uid, "profile_updated", None);

        Ok((
            StatusCode::OK,
            Json(ProfileResponse {
                status: "profile updated".to_owned(),
                profile,
            }),
        )
            .into_response())
    }
}
