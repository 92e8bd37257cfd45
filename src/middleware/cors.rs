// ABOUTME: CORS configuration for the web frontend
// ABOUTME: Builds a tower-http CorsLayer from the configured origin list
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::environment::CorsConfig;

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// An empty value or `*` allows any origin. Otherwise the value is a
/// comma-separated origin list; entries that are not valid header values
/// are skipped, and if none remain any origin is allowed.
///
/// ```bash
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,http://localhost:3000"
/// ```
#[must_use]
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let allowed = config.allowed_origins.trim();
    let allow_origin = if allowed.is_empty() || allowed == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        if origins.is_empty() {
            warn!(allowed, "No valid CORS origins configured; allowing any origin");
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers([
            HeaderName::from_static("content-disposition"),
            HeaderName::from_static("x-request-id"),
        ])
}
