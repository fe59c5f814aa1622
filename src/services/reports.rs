// ABOUTME: Progress report generation over a date period and report history
// ABOUTME: Sessions, metrics and measurements are loaded together and frozen into one payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::params::FieldValidator;
use crate::database::repositories::{
    MeasurementStore, PerformanceMetricStore, ReportStore, SessionSource,
};
use crate::resources::ServerResources;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fitcoach_core::errors::{AppError, AppResult};
use fitcoach_core::models::{
    MetricQuery, ProgressReport, ReportData, ReportListing, ReportMeasurement, ReportPerformance,
    PROGRESS_REPORT_TYPE,
};
use fitcoach_intelligence::ProgressSummarizer;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Body of `POST reports`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    /// First day of the period
    pub start_date: Option<String>,
    /// Last day of the period
    pub end_date: Option<String>,
    /// Subject user, defaults to the caller
    pub user_id: Option<String>,
}

/// A parsed reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    /// First day covered
    pub start: NaiveDate,
    /// Last day covered
    pub end: NaiveDate,
}

impl ReportPeriod {
    fn first_instant(self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    fn last_instant(self) -> DateTime<Utc> {
        let next_day = self.end.succ_opt().unwrap_or(NaiveDate::MAX);
        next_day.and_time(NaiveTime::MIN).and_utc() - Duration::nanoseconds(1)
    }
}

impl GenerateReportRequest {
    /// Parse into a period plus the optional subject
    ///
    /// # Errors
    ///
    /// Returns a validation error when either date is missing or malformed,
    /// when the period ends before it starts, or when `userId` is malformed
    pub fn parse(&self) -> AppResult<(ReportPeriod, Option<Uuid>)> {
        let mut validator = FieldValidator::new();
        let user_id = validator.uuid("userId", self.user_id.as_deref());
        let start = validator.date("startDate", self.start_date.as_deref());
        let end = validator.date("endDate", self.end_date.as_deref());

        for (field, raw) in [("startDate", &self.start_date), ("endDate", &self.end_date)] {
            if raw.as_deref().is_none_or(|raw| raw.trim().is_empty()) {
                validator.reject(field, format!("{field} is required"));
            }
        }
        if let (Some(start), Some(end)) = (start, end) {
            validator.check(start <= end, "endDate", "endDate must not be before startDate");
        }
        validator.finish()?;

        match (start, end) {
            (Some(start), Some(end)) => Ok((ReportPeriod { start, end }, user_id)),
            _ => Err(AppError::invalid_input("Start date and end date are required")),
        }
    }
}

/// Progress report operations
pub struct ReportService {
    sessions: Arc<dyn SessionSource>,
    metrics: Arc<dyn PerformanceMetricStore>,
    measurements: Arc<dyn MeasurementStore>,
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    /// Build the service from shared resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            sessions: resources.sessions.clone(),
            metrics: resources.metrics.clone(),
            measurements: resources.measurements.clone(),
            reports: resources.reports.clone(),
        }
    }

    /// Build, store and return a progress report about `user_id`
    ///
    /// # Errors
    ///
    /// Returns a database error if loading or storing fails
    pub async fn generate(
        &self,
        user_id: Uuid,
        period: ReportPeriod,
        now: DateTime<Utc>,
    ) -> AppResult<ProgressReport> {
        let first = period.first_instant();
        let last = period.last_instant();
        let metric_query = MetricQuery {
            start: Some(first),
            end: Some(last),
            ..MetricQuery::default()
        };

        let (sessions, metrics, measurements) = tokio::try_join!(
            self.sessions.scheduled_sessions(user_id, period.start, period.end),
            self.metrics.query_metrics(user_id, &metric_query),
            self.measurements.list_measurements(user_id, first),
        )?;

        let performance = metrics
            .into_iter()
            .map(|metric| ReportPerformance {
                metric_type: metric.metric_type,
                exercise: metric.exercise_name,
                value: metric.value,
                unit: metric.unit,
                recorded_at: metric.recorded_at,
            })
            .collect();

        // history comes back newest first and unbounded above
        let mut measurements: Vec<ReportMeasurement> = measurements
            .into_iter()
            .filter(|measurement| measurement.recorded_at <= last)
            .map(|measurement| ReportMeasurement {
                weight: measurement.weight,
                body_fat_percentage: measurement.body_fat_percentage,
                muscle_mass: measurement.muscle_mass,
                recorded_at: measurement.recorded_at,
            })
            .collect();
        measurements.reverse();

        let report = ProgressReport {
            id: Uuid::new_v4(),
            user_id,
            report_type: PROGRESS_REPORT_TYPE.to_owned(),
            period_start: period.start,
            period_end: period.end,
            generated_at: now,
            data: ReportData {
                summary: ProgressSummarizer::summarize(&sessions),
                workouts: ProgressSummarizer::workouts(&sessions),
                performance,
                measurements,
            },
        };

        self.reports.insert_report(&report).await?;
        info!(
            user_id = %user_id,
            report_id = %report.id,
            period_start = %period.start,
            period_end = %period.end,
            workouts = report.data.summary.total_workouts,
            "Generated progress report"
        );
        Ok(report)
    }

    /// Stored reports about `user_id`, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn history(&self, user_id: Uuid) -> AppResult<Vec<ReportListing>> {
        Ok(self.reports.list_reports(user_id).await?)
    }
}
