// ABOUTME: Dashboard route handler returning the caller's role-scoped summary
// ABOUTME: Client, trainer and admin payloads are discriminated by data.role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Dashboard routes
//!
//! The payload shape depends on the role in the caller's token; no query
//! parameters are accepted.

use super::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::resources::ServerResources;
use crate::services::DashboardService;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use fitcoach_core::errors::AppError;
use std::sync::Arc;

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard-stats", get(Self::handle_dashboard_stats))
            .with_state(resources)
    }

    /// Handle dashboard stats request
    async fn handle_dashboard_stats(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
    ) -> Result<Response, AppError> {
        let stats = DashboardService::new(&resources)
            .stats(&caller, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(stats))).into_response())
    }
}
