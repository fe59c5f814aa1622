// ABOUTME: Core data models for the fitcoach analytics service
// ABOUTME: Re-exports sessions, training load, metrics, users, measurements and reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Data Models
//!
//! Domain types shared by the analytics algorithms, the datastore and the HTTP
//! layer. JSON field names are camelCase to match the public API.
//!
//! ## Core Models
//!
//! - `WorkoutSession`: a scheduled or completed workout with nested exercise/set logs
//! - `TrainingLoadRecord`: one user's derived weekly load summary
//! - `PerformanceMetric`: an append-only point-in-time performance observation
//! - `User` / `ClientConnection`: identities and trainer-client relations
//! - `BodyMeasurement`: a body composition snapshot
//! - `ProgressReport`: a stored summary of one client's training over a period

mod measurement;
mod metric;
mod report;
mod session;
mod training_load;
mod user;

pub use measurement::{
    BodyMeasurement, MeasurementTimeRange, MeasurementUpdate, NewBodyMeasurement,
};
pub use metric::{MetricQuery, MetricType, NewPerformanceMetric, PerformanceMetric, PersonalBest};
pub use report::{
    ProgressReport, ReportData, ReportListing, ReportMeasurement, ReportPerformance, ReportSummary,
    ReportWorkout, PROGRESS_REPORT_TYPE,
};
pub use session::{ExerciseLog, SessionStatus, SetLog, WorkoutSession};
pub use training_load::TrainingLoadRecord;
pub use user::{display_name_from_email, ClientConnection, ConnectionStatus, User, UserRole};
