// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Unauthenticated liveness and readiness endpoints
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Health check routes for load balancers and uptime monitors

use axum::{routing::get, Json, Router};

use crate::constants::service_names;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": service_names::CLEANERS_ASSISTANT,
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
    }
}
