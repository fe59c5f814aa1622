// ABOUTME: Repository traits the analytics services depend on
// ABOUTME: Database implements all of them; tests substitute fakes at these seams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Repository pattern seams for the analytics services
//!
//! Each trait covers one concern so services only see what they need and tests
//! can replace a single collaborator (for example a [`SessionSource`] that
//! fails for one client).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{
    BodyMeasurement, ClientConnection, MeasurementUpdate, MetricQuery, NewBodyMeasurement,
    NewPerformanceMetric, PerformanceMetric, PersonalBest, ProgressReport, ReportListing,
    TrainingLoadRecord, User, WorkoutSession,
};
use serde::Serialize;
use uuid::Uuid;

/// Inclusive time range over session completion times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionRange {
    /// Earliest `actual_end_time` included
    pub start: Option<DateTime<Utc>>,
    /// Latest `actual_end_time` included
    pub end: Option<DateTime<Utc>>,
}

/// Counts shown in the trainer client overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCounts {
    /// Connections that are not archived
    pub total: u64,
    /// Connections with status `active`
    pub active: u64,
    /// Connections created since the start of the current month
    pub new_this_month: u64,
}

/// Platform-wide user counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    /// All users
    pub total_users: u64,
    /// Users with role `trainer`
    pub trainers: u64,
    /// Users with role `client`
    pub clients: u64,
}

/// Workout sessions, owned by the scheduling side of the platform
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Completed sessions (status `completed` with an end time) in `range`,
    /// ordered by end time, with nested exercise and set logs
    async fn completed_sessions(
        &self,
        user_id: Uuid,
        range: CompletionRange,
    ) -> Result<Vec<WorkoutSession>, DatabaseError>;

    /// Sessions of any status scheduled between `start` and `end` inclusive,
    /// ordered by scheduled date, with nested exercise and set logs
    async fn scheduled_sessions(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutSession>, DatabaseError>;

    /// UTC calendar days with at least one completed session since `since`
    async fn completion_dates(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<NaiveDate>, DatabaseError>;

    /// Number of completed sessions ever recorded for the user
    async fn count_completed_sessions(&self, user_id: Uuid) -> Result<u64, DatabaseError>;
}

/// Persisted weekly training load records
#[async_trait]
pub trait TrainingLoadStore: Send + Sync {
    /// Insert or replace the record keyed by (user, week start)
    async fn upsert_training_load(&self, record: &TrainingLoadRecord) -> Result<(), DatabaseError>;

    /// Stored record for one week
    async fn get_training_load(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<TrainingLoadRecord>, DatabaseError>;
}

/// Append-only performance metric log
#[async_trait]
pub trait PerformanceMetricStore: Send + Sync {
    /// Display name of a catalog exercise, `None` when it does not exist
    async fn exercise_name(&self, exercise_id: Uuid) -> Result<Option<String>, DatabaseError>;

    /// Append a metric observed at `recorded_at`
    async fn insert_metric(
        &self,
        user_id: Uuid,
        metric: &NewPerformanceMetric,
        recorded_at: DateTime<Utc>,
    ) -> Result<PerformanceMetric, DatabaseError>;

    /// Metrics matching every filter in `query`, oldest first
    async fn query_metrics(
        &self,
        user_id: Uuid,
        query: &MetricQuery,
    ) -> Result<Vec<PerformanceMetric>, DatabaseError>;

    /// Best value per (exercise, metric type)
    async fn personal_bests(&self, user_id: Uuid) -> Result<Vec<PersonalBest>, DatabaseError>;
}

/// Body composition snapshots
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Store a snapshot and its derived body metrics atomically
    async fn insert_measurement(
        &self,
        user_id: Uuid,
        measurement: &NewBodyMeasurement,
        recorded_at: DateTime<Utc>,
    ) -> Result<BodyMeasurement, DatabaseError>;

    /// Snapshots recorded at or after `since`, newest first
    async fn list_measurements(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<BodyMeasurement>, DatabaseError>;

    /// Most recent snapshot
    async fn latest_measurement(
        &self,
        user_id: Uuid,
    ) -> Result<Option<BodyMeasurement>, DatabaseError>;

    /// Apply `update` to an owned snapshot, `None` when there is none to edit
    async fn update_measurement(
        &self,
        user_id: Uuid,
        measurement_id: Uuid,
        update: &MeasurementUpdate,
    ) -> Result<Option<BodyMeasurement>, DatabaseError>;

    /// Remove an owned snapshot, `false` when there was none to remove
    async fn delete_measurement(
        &self,
        user_id: Uuid,
        measurement_id: Uuid,
    ) -> Result<bool, DatabaseError>;
}

/// Generated progress reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a generated report
    async fn insert_report(&self, report: &ProgressReport) -> Result<(), DatabaseError>;

    /// Reports about `user_id`, newest first, without their payloads
    async fn list_reports(&self, user_id: Uuid) -> Result<Vec<ReportListing>, DatabaseError>;
}

/// Users and trainer-client relations
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Look up a user
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Relation between a trainer and a client, whatever its status
    async fn get_connection(
        &self,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<ClientConnection>, DatabaseError>;

    /// Overview counts for a trainer
    async fn client_counts(
        &self,
        trainer_id: Uuid,
        month_start: DateTime<Utc>,
    ) -> Result<ClientCounts, DatabaseError>;

    /// Non-archived clients, most recently connected first
    async fn list_clients(
        &self,
        trainer_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ClientConnection>, DatabaseError>;

    /// Platform-wide user counts
    async fn role_counts(&self) -> Result<RoleCounts, DatabaseError>;

    /// Newest users first
    async fn recent_signups(&self, limit: u32) -> Result<Vec<User>, DatabaseError>;
}
