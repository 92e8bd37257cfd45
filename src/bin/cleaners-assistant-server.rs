// ABOUTME: HTTP server binary for the Home Cleaner's Assistant API
// ABOUTME: Loads environment configuration, initializes logging and serves until shutdown
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Home Cleaner's Assistant Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cleaners_assistant::{
    config::environment::ServerConfig, logging, resources::ServerResources, server::HttpServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cleaners-assistant-server")]
#[command(about = "Home Cleaner's Assistant API - clients, bids, quotes and contracts")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    logging::init_from_env()?;
    info!("Starting Home Cleaner's Assistant API");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config)?);
    if let Err(e) = HttpServer::new(resources).run().await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
