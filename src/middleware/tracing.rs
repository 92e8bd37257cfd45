// ABOUTME: HTTP request tracing built on tower-http's TraceLayer
// ABOUTME: One span per request with method, path and fields filled in by later middleware
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::{field, Span};

/// Span for one HTTP request; `request_id`, `user_id` and `status_code` are recorded later
pub fn create_request_span(method: &str, path: &str) -> Span {
    tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = field::Empty,
        user_id = field::Empty,
        status_code = field::Empty,
        duration_ms = field::Empty,
    )
}

type RequestSpanFn = fn(&Request<Body>) -> Span;
type ResponseFn = fn(&Response<Body>, Duration, &Span);

fn make_span(request: &Request<Body>) -> Span {
    create_request_span(request.method().as_str(), request.uri().path())
}

fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status_code", response.status().as_u16());
    span.record(
        "duration_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    tracing::info!(
        status = response.status().as_u16(),
        duration_ms = latency.as_millis(),
        "Request completed"
    );
}

/// Trace layer applied to the whole router
#[must_use]
pub fn http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpanFn,
    tower_http::trace::DefaultOnRequest,
    ResponseFn,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as RequestSpanFn)
        .on_response(on_response as ResponseFn)
}

/// Record the authenticated owner on the current request span
pub fn record_user(user_id: &str) {
    Span::current().record("user_id", user_id);
}
