// ABOUTME: Stored progress reports summarising one client's training over a period
// ABOUTME: The report payload is kept as generated so later edits never rewrite history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::{MetricType, SessionStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report type written by the progress report generator
pub const PROGRESS_REPORT_TYPE: &str = "progress_report";

/// Headline figures of a progress report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Sessions scheduled in the period, whatever their status
    pub total_workouts: u32,
    /// Sessions that were completed
    pub completed_workouts: u32,
    /// Completed share of scheduled sessions, whole percent
    pub completion_rate: u32,
    /// Minutes trained across completed sessions
    pub total_duration_minutes: i64,
    /// Volume across completed sessions, two decimals
    pub total_volume: f64,
    /// Mean RPE of completed sessions that reported one, one decimal
    pub average_rpe: Option<f64>,
}

/// One scheduled session as listed in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWorkout {
    /// Scheduled calendar date
    pub date: NaiveDate,
    /// Lifecycle state when the report was generated
    pub status: SessionStatus,
    /// Minutes trained, completed sessions only
    pub duration_minutes: Option<i64>,
    /// Volume, completed sessions only
    pub volume: Option<f64>,
    /// Completed sets, completed sessions only
    pub completed_sets: Option<u32>,
}

/// One performance observation as listed in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPerformance {
    /// Kind of observation
    pub metric_type: MetricType,
    /// Exercise display name, when the metric is exercise-specific
    pub exercise: Option<String>,
    /// Observed value
    pub value: f64,
    /// Unit of `value`
    pub unit: String,
    /// When the observation was made
    pub recorded_at: DateTime<Utc>,
}

/// One body measurement as listed in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeasurement {
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// When the snapshot was taken
    pub recorded_at: DateTime<Utc>,
}

/// Everything a progress report shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Headline figures
    pub summary: ReportSummary,
    /// Scheduled sessions, oldest first
    pub workouts: Vec<ReportWorkout>,
    /// Performance observations, oldest first
    pub performance: Vec<ReportPerformance>,
    /// Body measurements, oldest first
    pub measurements: Vec<ReportMeasurement>,
}

/// A generated and stored report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    /// Report identifier
    pub id: Uuid,
    /// Subject of the report
    pub user_id: Uuid,
    /// Kind of report
    pub report_type: String,
    /// First day covered
    pub period_start: NaiveDate,
    /// Last day covered
    pub period_end: NaiveDate,
    /// Generation time
    pub generated_at: DateTime<Utc>,
    /// Report contents
    #[serde(flatten)]
    pub data: ReportData,
}

/// Report listing entry without the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListing {
    /// Report identifier
    pub id: Uuid,
    /// Kind of report
    pub report_type: String,
    /// First day covered
    pub period_start: NaiveDate,
    /// Last day covered
    pub period_end: NaiveDate,
    /// Generation time
    pub generated_at: DateTime<Utc>,
}
