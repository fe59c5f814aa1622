// ABOUTME: HTTP server binary for the fitcoach analytics API
// ABOUTME: Loads configuration, opens the datastore and serves until interrupted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Fitcoach Analytics Server Binary
//!
//! Starts the analytics HTTP API with bearer token verification and the
//! configured `SQLite` datastore.

use anyhow::{Context, Result};
use clap::Parser;
use fitcoach_analytics::{
    auth::AuthManager,
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources, routes,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "fitcoach-server")]
#[command(about = "Fitcoach Analytics - training load, streaks and dashboards over HTTP")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url);
    }

    logging::init(&config)?;
    info!("Starting Fitcoach Analytics");
    info!("{}", config.summary());

    let database = Arc::new(
        Database::from_config(&config.database)
            .await
            .context("Failed to initialize database")?,
    );

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = Arc::new(ServerResources::new(
        database.clone(),
        auth_manager,
        Arc::new(config),
    ));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "HTTP server listening");

    let served = axum::serve(listener, routes::router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    database.close().await;

    if let Err(e) = served {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
