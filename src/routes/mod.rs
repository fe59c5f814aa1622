// ABOUTME: Route module organization and router assembly for the analytics HTTP API
// ABOUTME: Applies request-id, tracing, timeout and CORS layers around every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Route module for the fitcoach analytics service
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Training load, performance metric, measurement and report routes
pub mod analytics;
/// Role-scoped dashboard routes
pub mod dashboard;
/// Health check route
pub mod health;

pub use analytics::AnalyticsRoutes;
pub use dashboard::DashboardRoutes;
pub use health::HealthRoutes;

use crate::middleware::{request_timeout, setup_cors};
use crate::resources::ServerResources;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request};
use axum::middleware::from_fn_with_state;
use axum::{Json, Router};
use fitcoach_core::errors::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Success envelope shared by every API response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures are rendered by `AppError`
    pub success: bool,
    /// Payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let security = resources.config.security.clone();

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AnalyticsRoutes::routes(resources.clone()))
        .merge(DashboardRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or_default();
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(from_fn_with_state(security.request_timeout, request_timeout))
                .layer(setup_cors(&security)),
        )
}

/// Unwrap a JSON body, turning extractor rejections into 400s on `body`
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_field("body", rejection.body_text()))
}

/// Unwrap a query string, turning extractor rejections into 400s on `query`
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::invalid_field("query", rejection.body_text()))
}
