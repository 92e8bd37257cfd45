// ABOUTME: Main library entry point for the Home Cleaner's Assistant API
// ABOUTME: Clients, bids, quotes, contracts, calendar invites and e-mail for cleaning businesses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Home Cleaner's Assistant
//!
//! HTTP backend for small residential cleaning businesses. An owner signs in
//! with Firebase and manages:
//!
//! - **Clients** and their cleaning frequency
//! - **Bids** with walkthrough notes, photos and a computed quote
//! - **Estimates and contracts** rendered as PDF, e-signed and e-mailed
//! - **Calendar invites** that recur with the client's schedule
//! - **Area estimates** from a room photo on paid plans
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cleaners_assistant::config::environment::ServerConfig;
//! use cleaners_assistant::resources::ServerResources;
//! use cleaners_assistant::server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::from_config(config)?;
//!     HttpServer::new(Arc::new(resources)).run().await
//! }
//! ```

/// Floor-area estimation from room photos
pub mod area;

/// Bearer token authentication and plan gating
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants: pricing, defaults and document text
pub mod constants;

/// PDF and iCalendar rendering
pub mod documents;

/// Outgoing e-mail
pub mod email;

/// Unified error handling
pub mod errors;

/// Structured logging
pub mod logging;

/// HTTP middleware layers
pub mod middleware;

/// Domain records
pub mod models;

/// Quote calculation
pub mod quote;

/// Shared server resources
pub mod resources;

/// HTTP route groups
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// In-memory record store
pub mod store;

/// Multipart uploads and file storage
pub mod uploads;
