// ABOUTME: Workout session model with nested exercise and set logs
// ABOUTME: Sessions are owned by the session source and read-only to analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Scheduled, not started
    Planned,
    /// Started, not finished
    InProgress,
    /// Finished
    Completed,
    /// Deliberately not done
    Skipped,
}

impl SessionStatus {
    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            other => Err(AppError::invalid_input(format!(
                "Unknown session status: '{other}'"
            ))),
        }
    }
}

/// One logged set of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    /// 1-based position within the exercise
    pub set_number: u32,
    /// Whether the set was actually performed
    pub completed: bool,
    /// Repetitions performed (absent for timed/cardio sets)
    pub actual_reps: Option<u32>,
    /// Load used (absent for bodyweight/cardio sets)
    pub weight: Option<f64>,
}

/// One exercise performed within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    /// Catalog exercise, when linked
    pub exercise_id: Option<Uuid>,
    /// Logged sets in order
    pub set_logs: Vec<SetLog>,
}

/// A workout session as supplied by the session source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    /// Session identifier
    pub id: Uuid,
    /// The client who trained
    pub user_id: Uuid,
    /// Trainer who assigned the session
    pub trainer_id: Option<Uuid>,
    /// Lifecycle state
    pub status: SessionStatus,
    /// Planned calendar date
    pub scheduled_date: NaiveDate,
    /// When the session actually started
    pub actual_start_time: Option<DateTime<Utc>>,
    /// When the session actually ended
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Stored total volume, when the session source computed one
    pub total_volume: Option<f64>,
    /// Stored completed set count
    pub completed_sets: Option<u32>,
    /// Mean rate of perceived exertion for the session
    pub average_rpe: Option<f64>,
    /// Nested per-exercise logs
    #[serde(default)]
    pub exercise_logs: Vec<ExerciseLog>,
}

impl WorkoutSession {
    /// A completed session is `completed` and has a recorded end time
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed && self.actual_end_time.is_some()
    }

    /// Calendar day (UTC) on which a completed session finished
    #[must_use]
    pub fn completed_on(&self) -> Option<NaiveDate> {
        if self.is_completed() {
            self.actual_end_time.map(|end| end.date_naive())
        } else {
            None
        }
    }

    /// Completed set logs across all exercises
    pub fn completed_set_logs(&self) -> impl Iterator<Item = &SetLog> {
        self.exercise_logs
            .iter()
            .flat_map(|exercise| exercise.set_logs.iter())
            .filter(|set| set.completed)
    }
}
