// ABOUTME: Weekly training load record derived from completed workout sessions
// ABOUTME: Unique per (user, ISO week start) and fully recomputable from sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekly training load summary for one user
///
/// `week_start_date` is always the Monday of its ISO week. `load_ratio` is `None`
/// whenever `chronic_load` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLoadRecord {
    /// Owner of the sessions
    pub user_id: Uuid,
    /// Monday of the ISO week
    pub week_start_date: NaiveDate,
    /// Summed session volume
    pub total_volume: f64,
    /// Summed completed sets
    pub total_sets: u32,
    /// Summed logged repetitions
    pub total_reps: u32,
    /// Mean session RPE over sessions that reported one
    pub average_intensity: Option<f64>,
    /// Distinct calendar days with a completed session
    pub training_days: u32,
    /// Summed session duration in seconds
    pub total_duration: i64,
    /// Load over the trailing acute window ending on the week's last day
    pub acute_load: f64,
    /// Mean weekly load over the trailing chronic window
    pub chronic_load: f64,
    /// `acute_load / chronic_load`, absent when chronic load is zero
    pub load_ratio: Option<f64>,
    /// Configured risk band for `load_ratio`, when a policy is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_band: Option<String>,
    /// When the record was computed
    pub calculated_at: DateTime<Utc>,
}
