// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Merges route groups, applies middleware layers and serves until shutdown
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server
//!
//! Layer order, outermost first: CORS, HTTP tracing, request ID, body limit.
//! The trace span therefore exists before the request ID middleware records
//! into it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{http_trace_layer, request_id_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{
    AreaRoutes, BidRoutes, CalendarRoutes, ClientRoutes, ContractRoutes, EmailRoutes,
    EstimateRoutes, HealthRoutes, ProfileRoutes, SubscriptionRoutes,
};

/// Build the full application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let body_limit = resources.config.uploads.max_upload_bytes;
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(ClientRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(BidRoutes::routes(Arc::clone(&resources)))
        .merge(EstimateRoutes::routes(Arc::clone(&resources)))
        .merge(ContractRoutes::routes(Arc::clone(&resources)))
        .merge(EmailRoutes::routes(Arc::clone(&resources)))
        .merge(CalendarRoutes::routes(Arc::clone(&resources)))
        .merge(SubscriptionRoutes::routes(Arc::clone(&resources)))
        .merge(AreaRoutes::routes(resources))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(http_trace_layer())
        .layer(cors)
}

/// Owns the shared resources and runs the HTTP listener
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a server over the given resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind the configured address and serve until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns an error if the upload directory cannot be created, the
    /// address cannot be bound or the server fails while running
    pub async fn run(self) -> Result<()> {
        let config = &self.resources.config;
        let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", config.host, config.http_port))?;

        self.resources
            .uploads
            .ensure_dir()
            .await
            .context("Failed to prepare upload directory")?;

        if !config.firebase.is_configured() {
            warn!("Firebase is not configured; authenticated routes will return 503");
        }
        if self.resources.mailer.is_none() {
            warn!("SMTP is not configured; e-mail routes will return 503");
        }

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("HTTP server listening on http://{addr}");

        let app = build_router(Arc::clone(&self.resources));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
