// ABOUTME: Performance metric creation, filtered queries and personal bests
// ABOUTME: Validates every field of a submission before anything is written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::params::FieldValidator;
use crate::database::repositories::PerformanceMetricStore;
use crate::resources::ServerResources;
use chrono::{DateTime, Utc};
use fitcoach_core::constants::metrics::{MAX_NOTES_LENGTH, MAX_UNIT_LENGTH};
use fitcoach_core::errors::{AppError, AppResult};
use fitcoach_core::models::{
    MetricQuery, MetricType, NewPerformanceMetric, PerformanceMetric, PersonalBest,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Body of `POST performance-metrics`, as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetricRequest {
    /// Catalog exercise id
    pub exercise_id: Option<String>,
    /// One of the [`MetricType`] names
    pub metric_type: Option<String>,
    /// Observed value
    pub value: Option<f64>,
    /// Unit of `value`
    pub unit: Option<String>,
    /// Observation time; defaults to submission time
    pub recorded_at: Option<String>,
    /// Session that produced the observation
    pub workout_session_id: Option<String>,
    /// Free text
    pub notes: Option<String>,
}

/// Query string of `GET performance-metrics`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricQueryParams {
    /// Exact exercise match
    pub exercise_id: Option<String>,
    /// Exact metric type match
    pub metric_type: Option<String>,
    /// Inclusive lower bound
    pub start_date: Option<String>,
    /// Inclusive upper bound
    pub end_date: Option<String>,
    /// Subject user, defaults to the caller
    pub user_id: Option<String>,
}

impl MetricQueryParams {
    /// Parse into a typed query plus the optional subject
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every malformed parameter
    pub fn parse(&self) -> AppResult<(MetricQuery, Option<Uuid>)> {
        let mut validator = FieldValidator::new();
        let user_id = validator.uuid("userId", self.user_id.as_deref());
        let exercise_id = validator.uuid("exerciseId", self.exercise_id.as_deref());
        let metric_type = self
            .metric_type
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| validator.parse::<MetricType>("metricType", raw));
        let start = validator.instant("startDate", self.start_date.as_deref(), false);
        let end = validator.instant("endDate", self.end_date.as_deref(), true);

        if let (Some(start), Some(end)) = (start, end) {
            validator.check(start <= end, "endDate", "endDate must not be before startDate");
        }
        validator.finish()?;

        Ok((
            MetricQuery {
                exercise_id,
                metric_type,
                start,
                end,
            },
            user_id,
        ))
    }
}

/// Performance metric operations
pub struct PerformanceMetricsService {
    store: Arc<dyn PerformanceMetricStore>,
}

impl PerformanceMetricsService {
    /// Build the service from shared resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            store: resources.metrics.clone(),
        }
    }

    /// Validate a submission and append it for `user_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid field (including an
    /// `exerciseId` that does not exist), or a database error
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMetricRequest,
        now: DateTime<Utc>,
    ) -> AppResult<PerformanceMetric> {
        let metric = self.validate(request).await?;
        let recorded_at = metric.recorded_at.unwrap_or(now);

        let created = self.store.insert_metric(user_id, &metric, recorded_at).await?;
        info!(
            user_id = %user_id,
            metric_id = %created.id,
            metric_type = %created.metric_type,
            "Recorded performance metric"
        );
        Ok(created)
    }

    /// Metrics matching `query`, oldest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn query(&self, user_id: Uuid, query: &MetricQuery) -> AppResult<Vec<PerformanceMetric>> {
        Ok(self.store.query_metrics(user_id, query).await?)
    }

    /// Best value per exercise and metric type
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn personal_bests(&self, user_id: Uuid) -> AppResult<Vec<PersonalBest>> {
        Ok(self.store.personal_bests(user_id).await?)
    }

    async fn validate(&self, request: &CreateMetricRequest) -> AppResult<NewPerformanceMetric> {
        let mut validator = FieldValidator::new();

        let metric_type = match request.metric_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => validator.parse::<MetricType>("metricType", raw),
            _ => {
                validator.reject("metricType", "metricType is required");
                None
            }
        };

        let value = request.value;
        match value {
            None => validator.reject("value", "value is required"),
            Some(v) => validator.check(
                v.is_finite() && v > 0.0,
                "value",
                "value must be a positive number",
            ),
        }

        let unit = request.unit.as_deref().map(str::trim).unwrap_or_default();
        validator.check(!unit.is_empty(), "unit", "unit is required");
        validator.check(
            unit.chars().count() <= MAX_UNIT_LENGTH,
            "unit",
            format!("unit must be at most {MAX_UNIT_LENGTH} characters"),
        );

        if let Some(notes) = &request.notes {
            validator.check(
                notes.chars().count() <= MAX_NOTES_LENGTH,
                "notes",
                format!("notes must be at most {MAX_NOTES_LENGTH} characters"),
            );
        }

        let recorded_at = validator.instant("recordedAt", request.recorded_at.as_deref(), false);
        let workout_session_id =
            validator.uuid("workoutSessionId", request.workout_session_id.as_deref());

        let exercise_id = validator.uuid("exerciseId", request.exercise_id.as_deref());
        if let Some(id) = exercise_id {
            let exists = self.store.exercise_name(id).await?.is_some();
            validator.check(exists, "exerciseId", format!("Exercise {id} does not exist"));
        }

        validator.finish()?;

        // finish() succeeded, so both required fields parsed
        let (Some(metric_type), Some(value)) = (metric_type, value) else {
            return Err(AppError::internal(
                "Validated metric is missing required fields",
            ));
        };

        Ok(NewPerformanceMetric {
            exercise_id,
            metric_type,
            value,
            unit: unit.to_owned(),
            recorded_at,
            workout_session_id,
            notes: request.notes.clone().filter(|notes| !notes.trim().is_empty()),
        })
    }
}
