// ABOUTME: Main library entry point for the fitcoach analytics service
// ABOUTME: Training load, streaks, performance metrics and role-scoped dashboards over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![deny(unsafe_code)]

//! # Fitcoach Analytics
//!
//! Analytics backend for a trainer/client coaching platform. It reads
//! completed workout sessions and derives:
//!
//! - **Streaks**: the most recent run of consecutive training days
//! - **Training load**: weekly volume, sets, reps and duration with rolling
//!   acute and chronic load and their ratio
//! - **Performance metrics**: an append-only log of one-rep maxes, body
//!   composition and similar observations, plus personal bests
//! - **Dashboards**: one role-scoped summary for clients, trainers and admins
//!
//! The pure algorithms live in the `fitcoach-intelligence` crate; this crate
//! adds the `SQLite` datastore, services, authentication and the axum router.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fitcoach_analytics::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Analytics configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Bearer token verification
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` datastore and repository traits
pub mod database;

/// Unified error types
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Authentication extractor and CORS
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes and router assembly
pub mod routes;

/// Domain services behind the routes
pub mod services;

/// Domain models shared with the analytics crate
pub mod models {
    pub use fitcoach_core::models::*;
}

/// Application constants
pub mod constants {
    pub use fitcoach_core::constants::*;
}
