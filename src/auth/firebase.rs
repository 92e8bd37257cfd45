// ABOUTME: Firebase Authentication ID token validation
// ABOUTME: Verifies RS256 signatures against Google's certificates with Cache-Control driven key caching
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Firebase ID token validation
//!
//! - Public keys fetched from Google's X.509 certificate endpoint
//! - Keys cached for the `Cache-Control: max-age` of the response, clamped
//!   to between five minutes and one week
//! - Tokens validated for signature, issuer, audience and expiry
//!
//! ```rust,no_run
//! use cleaners_assistant::auth::firebase::FirebaseAuth;
//! use cleaners_assistant::auth::TokenVerifier;
//! use cleaners_assistant::config::environment::FirebaseConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FirebaseConfig {
//!     project_id: Some("my-project".to_owned()),
//!     api_key: None,
//!     enabled: true,
//!     key_cache_ttl_secs: 3600,
//! };
//! let firebase = FirebaseAuth::new(config);
//! let user = firebase.verify("eyJ...").await?;
//! println!("Owner UID: {}", user.uid);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use x509_parser::prelude::*;

use super::{AuthenticatedUser, TokenVerifier};
use crate::config::environment::FirebaseConfig;
use crate::errors::{AppError, AppResult};

/// Google's Firebase public key endpoint
const FIREBASE_CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

/// Firebase issuer prefix; the project ID is appended
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Minimum cache TTL in seconds (5 minutes)
const MIN_CACHE_TTL_SECS: i64 = 300;

/// Maximum cache TTL in seconds (7 days)
const MAX_CACHE_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Service name used in error messages
const FIREBASE_SERVICE: &str = "Firebase authentication";

struct CachedKeys {
    /// Key ID to PEM-encoded public key
    keys: HashMap<String, String>,
    expires_at: DateTime<Utc>,
}

/// Claims of a Firebase ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// Issuer
    pub iss: String,
    /// Audience (the project ID)
    pub aud: String,
    /// Firebase user UID
    pub sub: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiry timestamp
    pub exp: i64,
    /// User e-mail, if any
    pub email: Option<String>,
    /// Firebase-specific claims
    #[serde(default)]
    pub firebase: FirebaseSpecificClaims,
}

/// The `firebase` claim object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FirebaseSpecificClaims {
    /// Sign-in provider (e.g. "google.com", "password")
    pub sign_in_provider: Option<String>,
}

impl From<FirebaseClaims> for AuthenticatedUser {
    fn from(claims: FirebaseClaims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            provider: claims.firebase.sign_in_provider,
        }
    }
}

/// Firebase token validator with a shared key cache
pub struct FirebaseAuth {
    config: FirebaseConfig,
    http_client: Client,
    cached_keys: Arc<RwLock<Option<CachedKeys>>>,
}

impl FirebaseAuth {
    /// Create a validator
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
            cached_keys: Arc::new(RwLock::new(None)),
        }
    }

    /// Whether a project is configured and validation is enabled
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Validate a Firebase ID token
    ///
    /// # Errors
    ///
    /// - `EXTERNAL_SERVICE_UNAVAILABLE` when Firebase is not configured
    /// - `AUTH_EXPIRED` when the token is past its expiry
    /// - `AUTH_INVALID` for malformed tokens, unknown keys, bad signatures,
    ///   issuers or audiences
    /// - `EXTERNAL_SERVICE_ERROR` when Google's certificates cannot be fetched
    pub async fn validate_token(&self, token: &str) -> AppResult<FirebaseClaims> {
        let project_id = match (&self.config.project_id, self.config.enabled) {
            (Some(project_id), true) => project_id,
            _ => return Err(AppError::service_unavailable(FIREBASE_SERVICE)),
        };

        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Failed to decode Firebase token header");
            AppError::auth_invalid("Invalid Firebase token")
        })?;

        let kid = header.kid.ok_or_else(|| {
            debug!("Firebase token missing key ID (kid) in header");
            AppError::auth_invalid("Token missing key ID")
        })?;

        let pem_key = self.get_public_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_pem(pem_key.as_bytes()).map_err(|e| {
            warn!(error = %e, kid = %kid, "Failed to create decoding key from PEM");
            AppError::internal(format!("Invalid public key: {e}"))
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{FIREBASE_ISSUER_PREFIX}{project_id}")]);

        let token_data =
            decode::<FirebaseClaims>(token, &decoding_key, &validation).map_err(|e| {
                debug!(error = %e, "Firebase token validation failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::auth_expired(),
                    ErrorKind::InvalidAudience => AppError::auth_invalid("Invalid token audience"),
                    ErrorKind::InvalidIssuer => AppError::auth_invalid("Invalid token issuer"),
                    _ => AppError::auth_invalid("Invalid Firebase token"),
                }
            })?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(AppError::auth_invalid("Token has no subject"));
        }

        debug!(
            user_id = %claims.sub,
            provider = claims.firebase.sign_in_provider.as_deref().unwrap_or("unknown"),
            "Firebase token validated"
        );
        Ok(claims)
    }

    async fn get_public_key(&self, kid: &str) -> AppResult<String> {
        if let Some(key) = self.try_get_cached_key(kid).await {
            return Ok(key);
        }
        self.refresh_keys().await?;
        self.get_cached_key_or_error(kid).await
    }

    async fn try_get_cached_key(&self, kid: &str) -> Option<String> {
        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .filter(|cached| cached.expires_at > Utc::now())
            .and_then(|cached| cached.keys.get(kid).cloned())
    }

    async fn get_cached_key_or_error(&self, kid: &str) -> AppResult<String> {
        let cache = self.cached_keys.read().await;
        let cached = cache.as_ref().ok_or_else(|| {
            AppError::external_service(FIREBASE_SERVICE, "public keys unavailable")
        })?;
        cached.keys.get(kid).cloned().ok_or_else(|| {
            debug!(kid = %kid, "Firebase public key not found for kid");
            AppError::auth_invalid("Unknown token signing key")
        })
    }

    async fn refresh_keys(&self) -> AppResult<()> {
        info!("Fetching Firebase public keys from Google");
        let (certs, cache_ttl) = self.fetch_google_certificates().await?;
        let keys = convert_certs_to_keys(certs)?;

        let expires_at = Utc::now() + Duration::seconds(cache_ttl);
        info!(
            num_keys = keys.len(),
            cache_ttl_secs = cache_ttl,
            "Firebase public keys cached"
        );
        *self.cached_keys.write().await = Some(CachedKeys { keys, expires_at });
        Ok(())
    }

    async fn fetch_google_certificates(&self) -> AppResult<(HashMap<String, String>, i64)> {
        let response = self
            .http_client
            .get(FIREBASE_CERTS_URL)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch Firebase public keys");
                AppError::external_service(FIREBASE_SERVICE, format!("key fetch failed: {e}"))
            })?;

        let max_age = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age);
        let cache_ttl = key_cache_ttl(max_age, self.config.key_cache_ttl_secs);

        let certs: HashMap<String, String> = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Firebase public keys response");
            AppError::external_service(FIREBASE_SERVICE, format!("invalid key response: {e}"))
        })?;

        Ok((certs, cache_ttl))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseAuth {
    async fn verify(&self, token: &str) -> AppResult<AuthenticatedUser> {
        self.validate_token(token).await.map(AuthenticatedUser::from)
    }
}

fn convert_certs_to_keys(certs: HashMap<String, String>) -> AppResult<HashMap<String, String>> {
    let mut keys = HashMap::with_capacity(certs.len());
    for (kid, cert_pem) in certs {
        match extract_public_key_from_cert(&cert_pem) {
            Ok(public_key_pem) => {
                keys.insert(kid, public_key_pem);
            }
            Err(e) => {
                warn!(kid = %kid, error = %e, "Failed to extract public key from certificate");
            }
        }
    }

    if keys.is_empty() {
        return Err(AppError::external_service(
            FIREBASE_SERVICE,
            "no valid public keys found",
        ));
    }
    Ok(keys)
}

/// `max-age` seconds from a Cache-Control header
///
/// `"public, max-age=3600, must-revalidate"` yields `Some(3600)`.
#[must_use]
pub fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|seconds| seconds.parse().ok())
}

/// Seconds to keep fetched keys: the server's `max-age`, else the configured
/// TTL, clamped to `MIN_CACHE_TTL_SECS..=MAX_CACHE_TTL_SECS`
fn key_cache_ttl(max_age: Option<i64>, configured_secs: u64) -> i64 {
    let configured = i64::try_from(configured_secs).unwrap_or(MAX_CACHE_TTL_SECS);
    max_age
        .unwrap_or(configured)
        .clamp(MIN_CACHE_TTL_SECS, MAX_CACHE_TTL_SECS)
}

/// Public key of a PEM X.509 certificate, re-encoded as SPKI PEM
fn extract_public_key_from_cert(cert_pem: &str) -> AppResult<String> {
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 PEM: {e}")))?;
    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 certificate: {e}")))?;

    let encoded = STANDARD.encode(cert.public_key().raw);
    let body = encoded
        .as_bytes()
        .chunks(64)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(format!(
        "-----BEGIN PUBLIC KEY-----\n{body}\n-----END PUBLIC KEY-----"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_max_age() {
        assert_eq!(
            parse_max_age("public, max-age=19479, must-revalidate, no-transform"),
            Some(19479)
        );
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
    }

    #[test]
    fn test_key_cache_ttl_is_clamped() {
        assert_eq!(key_cache_ttl(Some(19479), 3600), 19479);
        assert_eq!(key_cache_ttl(None, 3600), 3600);
        assert_eq!(key_cache_ttl(Some(10), 3600), MIN_CACHE_TTL_SECS);
        assert_eq!(key_cache_ttl(Some(-5), 3600), MIN_CACHE_TTL_SECS);
        assert_eq!(key_cache_ttl(Some(i64::MAX), 3600), MAX_CACHE_TTL_SECS);
        assert_eq!(key_cache_ttl(None, u64::MAX), MAX_CACHE_TTL_SECS);

        // The clamped value always fits a chrono duration
        let ttl = key_cache_ttl(None, u64::MAX);
        assert!(Utc::now().checked_add_signed(Duration::seconds(ttl)).is_some());
    }

    #[test]
    fn test_invalid_certificate_is_skipped() {
        let mut certs = HashMap::new();
        certs.insert("kid-1".to_owned(), "not a certificate".to_owned());
        let error = convert_certs_to_keys(certs).unwrap_err();
        assert_eq!(error.code, ErrorCode::ExternalServiceError);
    }

    #[tokio::test]
    async fn test_unconfigured_firebase_is_unavailable() {
        let firebase = FirebaseAuth::new(FirebaseConfig::default());
        assert!(!firebase.is_enabled());
        let error = firebase.validate_token("abc").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected_before_key_fetch() {
        let firebase = FirebaseAuth::new(FirebaseConfig {
            project_id: Some("test-project".to_owned()),
            enabled: true,
            ..FirebaseConfig::default()
        });
        let error = firebase.verify("not-a-jwt").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthInvalid);
    }
}
