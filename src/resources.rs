// ABOUTME: Shared resource container handed to every route as axum state
// ABOUTME: Holds configuration, the store, the token verifier, the mailer and file storage
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc`. Integrations sit
//! behind trait objects so tests can swap in fakes for Firebase and SMTP.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::area::AreaEstimator;
use crate::auth::firebase::FirebaseAuth;
use crate::auth::{extract_bearer_token, AuthenticatedUser, TokenVerifier};
use crate::config::environment::ServerConfig;
use crate::email::{Mailer, SmtpMailer};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::middleware::record_user;
use crate::store::Store;
use crate::uploads::UploadStore;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// In-memory records
    pub store: Arc<Store>,
    /// Bearer token verification
    pub verifier: Arc<dyn TokenVerifier>,
    /// Outgoing e-mail; `None` when SMTP is not configured
    pub mailer: Option<Arc<dyn Mailer>>,
    /// Uploaded and generated files
    pub uploads: UploadStore,
    /// Room photo area estimator
    pub area_estimator: AreaEstimator,
}

impl ServerResources {
    /// Assemble resources from explicit parts
    #[must_use]
    pub fn new(
        config: ServerConfig,
        verifier: Arc<dyn TokenVerifier>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let uploads = UploadStore::new(config.uploads.directory.clone());
        let area_estimator = AreaEstimator::new(config.area.known_width_inches);
        Self {
            config: Arc::new(config),
            store: Arc::new(Store::new()),
            verifier,
            mailer,
            uploads,
            area_estimator,
        }
    }

    /// Build production resources: Firebase verification and SMTP when configured
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` when SMTP settings are present but invalid
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let verifier: Arc<dyn TokenVerifier> = Arc::new(FirebaseAuth::new(config.firebase.clone()));
        let mailer = SmtpMailer::from_config(&config.smtp)?
            .map(|mailer| Arc::new(mailer) as Arc<dyn Mailer>);
        Ok(Self::new(config, verifier, mailer))
    }

    /// Resolve the caller from the `Authorization` header
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED`, `AUTH_INVALID` or `AUTH_EXPIRED`
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let token = extract_bearer_token(headers)?;
        match self.verifier.verify(token).await {
            Ok(user) => {
                record_user(&user.uid);
                Ok(user)
            }
            Err(error) => {
                AppLogger::log_auth_event("anonymous", "token_rejected", false, Some(&error.message));
                Err(error)
            }
        }
    }

    /// The configured mailer
    ///
    /// # Errors
    ///
    /// Returns `EXTERNAL_SERVICE_UNAVAILABLE` when SMTP is not configured
    pub fn mailer(&self) -> AppResult<&Arc<dyn Mailer>> {
        self.mailer
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable("E-mail delivery"))
    }
}
