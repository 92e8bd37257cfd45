// ABOUTME: Configuration module root
// ABOUTME: Environment-only configuration for the HTTP server and its integrations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management
//!
//! All settings come from environment variables; there is no configuration
//! file. See [`environment::ServerConfig::from_env`].

/// Environment-based server configuration
pub mod environment;
