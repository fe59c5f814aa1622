// ABOUTME: Analytics route handlers for training load, metrics, measurements and reports
// ABOUTME: Thin handlers: authenticate, scope the subject, delegate to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Analytics routes
//!
//! Every handler requires a bearer token. `userId` lets trainers and admins
//! read another user's analytics, subject to [`resolve_subject`]. Measurement
//! edits and deletes only ever touch the caller's own snapshots.

use super::{json_body, query_params, ApiResponse};
use crate::middleware::AuthenticatedUser;
use crate::resources::ServerResources;
use crate::services::measurements::{
    measurement_id, CreateMeasurementRequest, MeasurementQueryParams, UpdateMeasurementRequest,
};
use crate::services::params::FieldValidator;
use crate::services::performance_metrics::{CreateMetricRequest, MetricQueryParams};
use crate::services::reports::GenerateReportRequest;
use crate::services::training_load::TrainingLoadQueryParams;
use crate::services::{
    resolve_subject, MeasurementService, PerformanceMetricsService, ReportService,
    TrainingLoadService,
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use fitcoach_core::errors::AppError;
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST training-load/calculate`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateLoadRequest {
    week_start_date: Option<String>,
    user_id: Option<String>,
}

/// Query string carrying only an optional subject
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectParams {
    user_id: Option<String>,
}

/// Analytics routes
pub struct AnalyticsRoutes;

impl AnalyticsRoutes {
    /// Create all analytics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/analytics/training-load",
                get(Self::handle_training_load),
            )
            .route(
                "/api/analytics/training-load/calculate",
                post(Self::handle_calculate_training_load),
            )
            .route(
                "/api/analytics/performance-metrics",
                get(Self::handle_query_metrics).post(Self::handle_create_metric),
            )
            .route(
                "/api/analytics/performance-metrics/personal-bests",
                get(Self::handle_personal_bests),
            )
            .route(
                "/api/analytics/measurements",
                get(Self::handle_list_measurements).post(Self::handle_create_measurement),
            )
            .route(
                "/api/analytics/measurements/:id",
                put(Self::handle_update_measurement).delete(Self::handle_delete_measurement),
            )
            .route(
                "/api/analytics/reports",
                get(Self::handle_list_reports).post(Self::handle_generate_report),
            )
            .with_state(resources)
    }

    /// Weekly training load history
    async fn handle_training_load(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        params: Result<Query<TrainingLoadQueryParams>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let (window, requested) = query_params(params)?
            .parse(resources.config.analytics.default_training_load_weeks)?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let now = Utc::now();
        let records = TrainingLoadService::new(&resources)
            .history(subject, window.start(now.date_naive()), now)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(records))).into_response())
    }

    /// Recompute and store one week
    async fn handle_calculate_training_load(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        body: Result<Json<CalculateLoadRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = json_body(body)?;

        let mut validator = FieldValidator::new();
        let requested = validator.uuid("userId", body.user_id.as_deref());
        let week = validator.date("weekStartDate", body.week_start_date.as_deref());
        if body.week_start_date.as_deref().is_none_or(|raw| raw.trim().is_empty()) {
            validator.reject("weekStartDate", "weekStartDate is required");
        }
        validator.finish()?;
        let week = week.ok_or_else(|| AppError::invalid_field("weekStartDate", "weekStartDate is required"))?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let record = TrainingLoadService::new(&resources)
            .recalculate_week(subject, week, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(record))).into_response())
    }

    /// Filtered performance metrics
    async fn handle_query_metrics(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        params: Result<Query<MetricQueryParams>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let (query, requested) = query_params(params)?.parse()?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let metrics = PerformanceMetricsService::new(&resources)
            .query(subject, &query)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(metrics))).into_response())
    }

    /// Record a performance metric for the caller
    async fn handle_create_metric(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        body: Result<Json<CreateMetricRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(body)?;

        let created = PerformanceMetricsService::new(&resources)
            .create(caller.user_id, &request, Utc::now())
            .await?;

        Ok((StatusCode::CREATED, Json(ApiResponse::new(created))).into_response())
    }

    /// Best value per exercise and metric type
    async fn handle_personal_bests(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        params: Result<Query<SubjectParams>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let params = query_params(params)?;

        let mut validator = FieldValidator::new();
        let requested = validator.uuid("userId", params.user_id.as_deref());
        validator.finish()?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let bests = PerformanceMetricsService::new(&resources)
            .personal_bests(subject)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(bests))).into_response())
    }

    /// Measurement history, newest first
    async fn handle_list_measurements(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        params: Result<Query<MeasurementQueryParams>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let (range, requested) = query_params(params)?.parse()?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let measurements = MeasurementService::new(&resources)
            .history(subject, range, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(measurements))).into_response())
    }

    /// Record a body measurement snapshot for the caller
    async fn handle_create_measurement(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        body: Result<Json<CreateMeasurementRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(body)?;

        let stored = MeasurementService::new(&resources)
            .record(caller.user_id, &request, Utc::now())
            .await?;

        Ok((StatusCode::CREATED, Json(ApiResponse::new(stored))).into_response())
    }

    /// Edit one of the caller's own snapshots
    async fn handle_update_measurement(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        Path(id): Path<String>,
        body: Result<Json<UpdateMeasurementRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let id = measurement_id(&id)?;
        let request = json_body(body)?;

        let updated = MeasurementService::new(&resources)
            .update(caller.user_id, id, &request)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(updated))).into_response())
    }

    /// Delete one of the caller's own snapshots
    async fn handle_delete_measurement(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = measurement_id(&id)?;

        MeasurementService::new(&resources)
            .delete(caller.user_id, id)
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Stored progress reports, newest first
    async fn handle_list_reports(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        params: Result<Query<SubjectParams>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let params = query_params(params)?;

        let mut validator = FieldValidator::new();
        let requested = validator.uuid("userId", params.user_id.as_deref());
        validator.finish()?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let reports = ReportService::new(&resources).history(subject).await?;

        Ok((StatusCode::OK, Json(ApiResponse::new(reports))).into_response())
    }

    /// Generate and store a progress report for a period
    async fn handle_generate_report(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthenticatedUser,
        body: Result<Json<GenerateReportRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let (period, requested) = json_body(body)?.parse()?;

        let subject = resolve_subject(resources.directory.as_ref(), &caller, requested).await?;
        let report = ReportService::new(&resources)
            .generate(subject, period, Utc::now())
            .await?;

        Ok((StatusCode::CREATED, Json(ApiResponse::new(report))).into_response())
    }
}
