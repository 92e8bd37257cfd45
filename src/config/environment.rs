// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management for production deployment

use crate::constants::defaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Read an environment variable or fall back to a default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read the first set variable among `keys`
fn first_env_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .filter(|value| !value.trim().is_empty())
}

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Cross-origin settings for the web frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin list, or `*`
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
        }
    }
}

/// Upload storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory receiving photos, signatures, logos and generated documents
    pub directory: PathBuf,
    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::UPLOADS_DIR),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }
}

/// Firebase Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Firebase project ID (required for token validation)
    pub project_id: Option<String>,
    /// Firebase API key (optional, for client-side SDK)
    pub api_key: Option<String>,
    /// Whether Firebase authentication is enabled
    pub enabled: bool,
    /// Cache TTL for Firebase public keys in seconds (default: 3600 = 1 hour)
    pub key_cache_ttl_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            enabled: false,
            key_cache_ttl_secs: defaults::FIREBASE_KEY_CACHE_TTL_SECS,
        }
    }
}

impl FirebaseConfig {
    /// Returns `true` if Firebase is enabled and has a project ID configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.enabled && self.project_id.is_some()
    }

    /// Load Firebase configuration from environment
    ///
    /// Environment variables:
    /// - `FIREBASE_PROJECT_ID` - Firebase project ID (required for token validation)
    /// - `FIREBASE_API_KEY` - Firebase API key (optional)
    /// - `FIREBASE_ENABLED` - Enable Firebase authentication (default: true when a project is set)
    /// - `FIREBASE_KEY_CACHE_TTL_SECS` - Public key cache TTL (default: 3600)
    #[must_use]
    pub fn from_env() -> Self {
        let project_id = first_env_var(&["FIREBASE_PROJECT_ID"]);
        let api_key = first_env_var(&["FIREBASE_API_KEY"]);

        let enabled = project_id.is_some()
            && env_var_or("FIREBASE_ENABLED", "true")
                .parse()
                .unwrap_or(true);

        if enabled {
            info!(
                project_id = project_id.as_deref().unwrap_or("(not set)"),
                "Firebase authentication enabled"
            );
        } else {
            warn!("Firebase authentication is not configured; authenticated routes will reject all requests");
        }

        Self {
            project_id,
            api_key,
            enabled,
            key_cache_ttl_secs: env::var("FIREBASE_KEY_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::FIREBASE_KEY_CACHE_TTL_SECS),
        }
    }
}

/// SMTP delivery configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,
    /// Submission port (STARTTLS)
    pub port: u16,
    /// Login user
    pub username: Option<String>,
    /// Login password or app password
    pub password: Option<String>,
    /// Sender address, defaults to the login user
    pub from_address: Option<String>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: defaults::SMTP_HOST.to_owned(),
            port: defaults::SMTP_PORT,
            username: None,
            password: None,
            from_address: None,
        }
    }
}

impl SmtpConfig {
    /// SMTP is usable once credentials are present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Sender address for outgoing mail
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.from_address.as_deref().or(self.username.as_deref())
    }

    /// Load SMTP configuration from environment
    ///
    /// `SMTP_USERNAME`/`SMTP_PASSWORD` take precedence over the legacy
    /// `GMAIL_USER`/`GMAIL_APP_PASS` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if `SMTP_PORT` is set but not a valid port number
    pub fn from_env() -> Result<Self> {
        let port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid SMTP_PORT value: {raw}"))?,
            Err(_) => defaults::SMTP_PORT,
        };

        Ok(Self {
            host: env_var_or("SMTP_HOST", defaults::SMTP_HOST),
            port,
            username: first_env_var(&["SMTP_USERNAME", "GMAIL_USER"]),
            password: first_env_var(&["SMTP_PASSWORD", "GMAIL_APP_PASS"]),
            from_address: first_env_var(&["SMTP_FROM"]),
        })
    }
}

/// Floor-area estimator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEstimatorConfig {
    /// Real-world width the photo frame is assumed to span
    pub known_width_inches: f64,
}

impl Default for AreaEstimatorConfig {
    fn default() -> Self {
        Self {
            known_width_inches: defaults::AREA_KNOWN_WIDTH_INCHES,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind host
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// CORS settings
    pub cors: CorsConfig,
    /// Upload storage
    pub uploads: UploadConfig,
    /// Firebase token validation
    pub firebase: FirebaseConfig,
    /// Outgoing e-mail
    pub smtp: SmtpConfig,
    /// Floor-area estimator
    pub area: AreaEstimatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            environment: Environment::default(),
            log_level: LogLevel::default(),
            cors: CorsConfig::default(),
            uploads: UploadConfig::default(),
            firebase: FirebaseConfig::default(),
            smtp: SmtpConfig::default(),
            area: AreaEstimatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is present but malformed
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT value: {raw}"))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid MAX_UPLOAD_BYTES value: {raw}"))?,
            Err(_) => defaults::MAX_UPLOAD_BYTES,
        };

        let known_width_inches = match env::var("AREA_KNOWN_WIDTH_INCHES") {
            Ok(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w > 0.0)
                .with_context(|| format!("Invalid AREA_KNOWN_WIDTH_INCHES value: {raw}"))?,
            Err(_) => defaults::AREA_KNOWN_WIDTH_INCHES,
        };

        Ok(Self {
            http_port,
            host: env_var_or("HOST", defaults::HOST),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    "CORS_ALLOWED_ORIGINS",
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
            uploads: UploadConfig {
                directory: PathBuf::from(env_var_or("UPLOADS_DIR", defaults::UPLOADS_DIR)),
                max_upload_bytes,
            },
            firebase: FirebaseConfig::from_env(),
            smtp: SmtpConfig::from_env()?,
            area: AreaEstimatorConfig { known_width_inches },
        })
    }

    /// One-line summary for startup logs; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} host={} port={} uploads={} max_upload_bytes={} firebase={} smtp={}",
            self.environment,
            self.host,
            self.http_port,
            self.uploads.directory.display(),
            self.uploads.max_upload_bytes,
            if self.firebase.is_configured() {
                "enabled"
            } else {
                "disabled"
            },
            if self.smtp.is_configured() {
                "configured"
            } else {
                "disabled"
            },
        )
    }
}
