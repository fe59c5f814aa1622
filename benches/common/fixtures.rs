// ABOUTME: Benchmark fixtures generating workout session histories
// ABOUTME: Deterministic data so repeated runs measure the same work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Benchmark fixtures for workout session histories.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fitcoach_analytics::models::{ExerciseLog, SessionStatus, SetLog, WorkoutSession};
use uuid::Uuid;

/// Predefined history sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum SessionBatchSize {
    /// A month of training
    Small,
    /// A year of training
    Medium,
    /// Several years of near-daily training
    Large,
}

impl SessionBatchSize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Small => 20,
            Self::Medium => 250,
            Self::Large => 1500,
        }
    }
}

/// Fixed reference instant so results do not drift between runs
#[must_use]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Generate `size` completed sessions ending at [`reference_time`], one per day
/// with every seventh day skipped
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn generate_sessions(user_id: Uuid, size: SessionBatchSize) -> Vec<WorkoutSession> {
    let end = reference_time();
    (0..size.count())
        .filter(|index| index % 7 != 6)
        .map(|index| {
            let finished = end - Duration::days(index as i64);
            WorkoutSession {
                id: Uuid::new_v4(),
                user_id,
                trainer_id: None,
                status: SessionStatus::Completed,
                scheduled_date: finished.date_naive(),
                actual_start_time: Some(finished - Duration::hours(1)),
                actual_end_time: Some(finished),
                total_volume: None,
                completed_sets: None,
                average_rpe: Some(6.0 + (index % 4) as f64 * 0.5),
                exercise_logs: vec![ExerciseLog {
                    exercise_id: None,
                    set_logs: (1..=4)
                        .map(|set_number| SetLog {
                            set_number,
                            completed: true,
                            actual_reps: Some(8),
                            weight: Some(60.0 + (index % 10) as f64 * 2.5),
                        })
                        .collect(),
                }],
            }
        })
        .collect()
}
