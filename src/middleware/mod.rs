// ABOUTME: HTTP middleware for request IDs, tracing and CORS
// ABOUTME: Layers applied to every route of the router

/// CORS configuration
pub mod cors;
/// Request ID generation and propagation
pub mod request_id;
/// Per-request tracing spans
pub mod tracing;

pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use tracing::{create_request_span, http_trace_layer, record_user};
