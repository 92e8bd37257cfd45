// ABOUTME: Request authentication and subscription gating
// ABOUTME: Bearer token extraction, the token verifier seam and plan checks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authentication
//!
//! Every business route resolves the caller's Firebase UID from an
//! `Authorization: Bearer <token>` header. The UID scopes all data access.
//! Verification sits behind [`TokenVerifier`] so the HTTP layer does not
//! depend on Google's key endpoint.

/// Firebase ID token validation
pub mod firebase;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::SubscriptionTier;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Firebase UID; the owner key for all records
    pub uid: String,
    /// E-mail claim, if present
    pub email: Option<String>,
    /// Sign-in provider, if present
    pub provider: Option<String>,
}

/// Verifies bearer tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve a raw token (without the `Bearer ` prefix) to a user
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` or `AUTH_EXPIRED` for rejected tokens
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser>;
}

/// Token from the `Authorization` header
///
/// # Errors
///
/// - `AUTH_REQUIRED` when the header is absent
/// - `AUTH_INVALID` when it is not a non-empty bearer token
pub fn extract_bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))?;

    let token = value
        .get(..BEARER_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX))
        .map(|_| value[BEARER_PREFIX.len()..].trim())
        .ok_or_else(|| AppError::auth_invalid("Invalid authorization header format"))?;

    if token.is_empty() {
        return Err(AppError::auth_invalid("Empty bearer token"));
    }
    Ok(token)
}

/// Check a plan meets the minimum for a feature
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` with `"<Tier> plan required"`
pub fn require_tier(current: SubscriptionTier, minimum: SubscriptionTier) -> AppResult<()> {
    if current >= minimum {
        Ok(())
    } else {
        Err(AppError::permission_denied(format!(
            "{} plan required",
            minimum.display_name()
        ))
        .with_details(serde_json::json!({
            "current": current.as_str(),
            "required": minimum.as_str(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_requires_auth() {
        let error = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthRequired);
        assert_eq!(error.message, "Missing Authorization Header");
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
        let headers = headers_with("bearer  xyz ");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn test_malformed_headers_are_invalid() {
        for value in ["Basic abc", "Bearer", "Bearer    ", "token"] {
            let error = extract_bearer_token(&headers_with(value)).unwrap_err();
            assert_eq!(error.code, ErrorCode::AuthInvalid, "{value}");
        }
    }

    #[test]
    fn test_require_tier() {
        assert!(require_tier(SubscriptionTier::Pro, SubscriptionTier::Pro).is_ok());
        assert!(require_tier(SubscriptionTier::Enterprise, SubscriptionTier::Pro).is_ok());
        let error = require_tier(SubscriptionTier::Free, SubscriptionTier::Pro).unwrap_err();
        assert_eq!(error.code, ErrorCode::PermissionDenied);
        assert_eq!(error.message, "Pro plan required");
    }
}
