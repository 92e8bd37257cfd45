// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log levels, formatters, and structured business event helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Production-ready logging configuration with structured output

use crate::constants::service_names;
use anyhow::Result;
use serde_json::json;
use std::env;
use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, falling back to pretty output
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::CLEANERS_ASSISTANT.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT")
            .map(|v| LogFormat::from_str_or_default(&v))
            .unwrap_or(LogFormat::Pretty);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::CLEANERS_ASSISTANT.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the filter, always applying noise reduction for HTTP internals
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );

        [
            "hyper=warn".to_owned(),
            "hyper::proto=warn".to_owned(),
            "reqwest=warn".to_owned(),
            "lettre=warn".to_owned(),
            "tower_http=info".to_owned(),
            format!("cleaners_assistant={}", self.level),
        ]
        .iter()
        .fold(base, |filter, directive| {
            filter.add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
        })
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber has already been installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Home Cleaner's Assistant starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        info!("Logging configured: {}", config_summary);
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Application-specific logging utilities
///
/// Every business event carries the owner's Firebase UID so a single
/// cleaner's activity can be filtered out of the shared log stream.
pub struct AppLogger;

impl AppLogger {
    /// Log a business event (client created, bid saved, contract signed, ...)
    pub fn log_event(user_id: &str, event: &str, resource_id: Option<&str>) {
        info!(
            user.id = %user_id,
            event = %event,
            resource.id = resource_id.unwrap_or(""),
            "Business event"
        );
    }

    /// Log a failed business operation together with its cause
    pub fn log_failure(user_id: &str, event: &str, cause: &dyn std::fmt::Display) {
        error!(
            user.id = %user_id,
            event = %event,
            error = %cause,
            "Business operation failed"
        );
    }

    /// Log user authentication events
    pub fn log_auth_event(user_id: &str, event: &str, success: bool, details: Option<&str>) {
        info!(
            user.id = %user_id,
            auth.event = %event,
            auth.success = %success,
            auth.details = details.unwrap_or(""),
            "Authentication event"
        );
    }

    /// Log outgoing e-mail deliveries
    pub fn log_email_event(user_id: &str, bid_id: &str, attachment: &str, success: bool) {
        info!(
            user.id = %user_id,
            bid.id = %bid_id,
            email.attachment = %attachment,
            email.success = %success,
            "Email delivery"
        );
    }

    /// Log security events
    pub fn log_security_event(
        event_type: &str,
        severity: &str,
        details: &str,
        user_id: Option<&str>,
    ) {
        warn!(
            security.event = %event_type,
            security.severity = %severity,
            security.details = %details,
            user.id = user_id.unwrap_or("unknown"),
            "Security event"
        );
    }
}
