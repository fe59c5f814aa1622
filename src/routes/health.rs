// ABOUTME: Health check route for service monitoring and load balancers
// ABOUTME: Unauthenticated and independent of the datastore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use axum::{routing::get, Json, Router};
use fitcoach_core::constants::service::{SERVICE_NAME, SERVICE_VERSION};
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": SERVICE_VERSION,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
