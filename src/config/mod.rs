// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Configuration module for the fitcoach analytics service
//!
//! All settings come from environment variables (optionally via `.env`):
//!
//! - **Server**: port, log level, environment
//! - **Database**: `SQLite` location and pool size
//! - **Auth**: JWT verification secret
//! - **Analytics**: rolling windows, streak lookback, dashboard fan-out and risk bands
//! - **Security**: CORS origins and request timeout

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AnalyticsConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel,
    SecurityConfig, ServerConfig,
};
