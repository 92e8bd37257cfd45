// ABOUTME: Unit tests for environment configuration loading
// ABOUTME: Validates defaults, overrides, legacy SMTP variables and malformed values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use cleaners_assistant::config::environment::{Environment, LogLevel, ServerConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "HTTP_PORT",
    "HOST",
    "ENVIRONMENT",
    "LOG_LEVEL",
    "CORS_ALLOWED_ORIGINS",
    "UPLOADS_DIR",
    "MAX_UPLOAD_BYTES",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_API_KEY",
    "FIREBASE_ENABLED",
    "FIREBASE_KEY_CACHE_TTL_SECS",
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USERNAME",
    "SMTP_PASSWORD",
    "SMTP_FROM",
    "GMAIL_USER",
    "GMAIL_APP_PASS",
    "AREA_KNOWN_WIDTH_INCHES",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
    assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
    assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("production"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("test"),
        Environment::Testing
    );
    assert_eq!(
        Environment::from_str_or_default("invalid"),
        Environment::Development
    );
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.uploads.directory, PathBuf::from("uploads"));
    assert_eq!(config.uploads.max_upload_bytes, 10 * 1024 * 1024);
    assert!(!config.firebase.is_configured());
    assert!(!config.smtp.is_configured());
    assert_eq!(config.smtp.host, "smtp.gmail.com");
    assert_eq!(config.smtp.port, 587);
    assert!((config.area.known_width_inches - 120.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9000");
    env::set_var("UPLOADS_DIR", "/tmp/cleaning-uploads");
    env::set_var("FIREBASE_PROJECT_ID", "sparkle-prod");
    env::set_var("SMTP_USERNAME", "mailer@sparkle.example");
    env::set_var("SMTP_PASSWORD", "app-password");
    env::set_var("AREA_KNOWN_WIDTH_INCHES", "144");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 9000);
    assert_eq!(
        config.uploads.directory,
        PathBuf::from("/tmp/cleaning-uploads")
    );
    assert!(config.firebase.is_configured());
    assert_eq!(config.firebase.project_id.as_deref(), Some("sparkle-prod"));
    assert!(config.smtp.is_configured());
    assert_eq!(config.smtp.sender(), Some("mailer@sparkle.example"));
    assert!((config.area.known_width_inches - 144.0).abs() < f64::EPSILON);

    let summary = config.summary();
    assert!(summary.contains("firebase=enabled"));
    assert!(summary.contains("smtp=configured"));
    assert!(!summary.contains("app-password"));
}

#[test]
#[serial]
fn test_legacy_gmail_variables() {
    clear_env();
    env::set_var("GMAIL_USER", "owner@gmail.example");
    env::set_var("GMAIL_APP_PASS", "legacy-pass");
    env::set_var("SMTP_FROM", "billing@sparkle.example");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.smtp.username.as_deref(), Some("owner@gmail.example"));
    assert_eq!(config.smtp.sender(), Some("billing@sparkle.example"));
}

#[test]
#[serial]
fn test_firebase_can_be_disabled() {
    clear_env();
    env::set_var("FIREBASE_PROJECT_ID", "sparkle-prod");
    env::set_var("FIREBASE_ENABLED", "false");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(!config.firebase.is_configured());
}

#[test]
#[serial]
fn test_malformed_values_are_errors() {
    for (var, value) in [
        ("HTTP_PORT", "eighty"),
        ("SMTP_PORT", "99999"),
        ("MAX_UPLOAD_BYTES", "-1"),
        ("AREA_KNOWN_WIDTH_INCHES", "0"),
    ] {
        clear_env();
        env::set_var(var, value);
        assert!(ServerConfig::from_env().is_err(), "{var}={value}");
    }
    clear_env();
}

#[test]
fn test_debug_redacts_smtp_password() {
    let mut config = ServerConfig::default();
    config.smtp.password = Some("super-secret".to_owned());
    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[REDACTED]"));
}
