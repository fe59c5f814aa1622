// ABOUTME: Weekly training load aggregation over completed workout sessions
// ABOUTME: Buckets sessions by ISO week and attaches rolling acute/chronic load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::rolling_load::RollingLoadAnalyzer;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use fitcoach_core::models::{TrainingLoadRecord, WorkoutSession};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Monday of the ISO week containing `date`
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Load contributed by one completed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLoad {
    /// Session the load was derived from
    pub session_id: Uuid,
    /// When the session finished
    pub ended_at: DateTime<Utc>,
    /// Volume: stored total, else reps x weight over completed sets
    pub volume: f64,
    /// Completed sets: stored count, else number of completed set logs
    pub sets: u32,
    /// Repetitions logged on completed sets
    pub reps: u32,
    /// Session length in seconds, never negative
    pub duration_secs: i64,
    /// Session RPE when reported
    pub rpe: Option<f64>,
}

impl SessionLoad {
    /// Derive the load of a session, `None` unless it is completed
    #[must_use]
    pub fn from_session(session: &WorkoutSession) -> Option<Self> {
        if !session.is_completed() {
            return None;
        }
        let ended_at = session.actual_end_time?;

        let volume = session.total_volume.unwrap_or_else(|| {
            session
                .completed_set_logs()
                .filter_map(|set| Some(f64::from(set.actual_reps?) * set.weight?))
                .sum()
        });

        let sets = session.completed_sets.unwrap_or_else(|| {
            u32::try_from(session.completed_set_logs().count()).unwrap_or(u32::MAX)
        });

        let reps = session
            .completed_set_logs()
            .filter_map(|set| set.actual_reps)
            .fold(0_u32, u32::saturating_add);

        let duration_secs = session
            .actual_start_time
            .map_or(0, |start| (ended_at - start).num_seconds().max(0));

        Some(Self {
            session_id: session.id,
            ended_at,
            volume,
            sets,
            reps,
            duration_secs,
            rpe: session.average_rpe,
        })
    }

    /// Calendar day (UTC) the session counts towards
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.ended_at.date_naive()
    }
}

/// Weekly load aggregator
///
/// Output depends only on the session set, never on the order sessions are
/// supplied in, so recomputing a week is idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAggregator {
    analyzer: RollingLoadAnalyzer,
}

impl LoadAggregator {
    /// Aggregator with the standard rolling windows
    #[must_use]
    pub const fn new() -> Self {
        Self {
            analyzer: RollingLoadAnalyzer::new(),
        }
    }

    /// Aggregator using a custom rolling analyzer
    #[must_use]
    pub const fn with_analyzer(analyzer: RollingLoadAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Rolling analyzer used for acute/chronic load
    #[must_use]
    pub const fn analyzer(&self) -> &RollingLoadAnalyzer {
        &self.analyzer
    }

    /// Earliest day whose sessions influence the record of the week starting `week`
    #[must_use]
    pub fn history_start(&self, week: NaiveDate) -> NaiveDate {
        let week_end = week + Duration::days(6);
        week_end - Duration::days(i64::from(self.analyzer.lookback_days()) - 1)
    }

    /// One record per ISO week that has a completed session, oldest first
    ///
    /// Every session in `sessions` feeds the rolling windows, so callers that only
    /// want a range of weeks should still pass the preceding chronic window.
    #[must_use]
    pub fn aggregate(
        &self,
        user_id: Uuid,
        sessions: &[WorkoutSession],
        calculated_at: DateTime<Utc>,
    ) -> Vec<TrainingLoadRecord> {
        let loads = Self::session_loads(sessions);
        let series = Self::daily_series(&loads);

        let mut weeks: BTreeMap<NaiveDate, Vec<&SessionLoad>> = BTreeMap::new();
        for load in &loads {
            weeks.entry(week_start(load.day())).or_default().push(load);
        }

        weeks
            .into_iter()
            .map(|(week, week_loads)| {
                self.build_record(user_id, week, &week_loads, &series, calculated_at)
            })
            .collect()
    }

    /// Record for a single week, produced even when the week has no sessions
    ///
    /// `week` is normalised to its Monday.
    #[must_use]
    pub fn aggregate_week(
        &self,
        user_id: Uuid,
        week: NaiveDate,
        sessions: &[WorkoutSession],
        calculated_at: DateTime<Utc>,
    ) -> TrainingLoadRecord {
        let week = week_start(week);
        let loads = Self::session_loads(sessions);
        let series = Self::daily_series(&loads);
        let week_loads: Vec<&SessionLoad> = loads
            .iter()
            .filter(|load| week_start(load.day()) == week)
            .collect();

        self.build_record(user_id, week, &week_loads, &series, calculated_at)
    }

    fn session_loads(sessions: &[WorkoutSession]) -> Vec<SessionLoad> {
        let mut loads: Vec<SessionLoad> = sessions.iter().filter_map(SessionLoad::from_session).collect();
        // float sums must not depend on the order the datastore returned rows in
        loads.sort_by(|a, b| {
            a.ended_at
                .cmp(&b.ended_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        loads.dedup_by_key(|load| load.session_id);
        loads
    }

    fn daily_series(loads: &[SessionLoad]) -> Vec<(NaiveDate, f64)> {
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for load in loads {
            *days.entry(load.day()).or_insert(0.0) += load.volume;
        }
        days.into_iter().collect()
    }

    fn build_record(
        &self,
        user_id: Uuid,
        week: NaiveDate,
        loads: &[&SessionLoad],
        series: &[(NaiveDate, f64)],
        calculated_at: DateTime<Utc>,
    ) -> TrainingLoadRecord {
        let total_volume: f64 = loads.iter().map(|load| load.volume).sum();
        let total_sets = loads.iter().fold(0_u32, |acc, load| acc.saturating_add(load.sets));
        let total_reps = loads.iter().fold(0_u32, |acc, load| acc.saturating_add(load.reps));
        let total_duration: i64 = loads.iter().map(|load| load.duration_secs).sum();

        let training_days: BTreeSet<NaiveDate> = loads.iter().map(|load| load.day()).collect();

        let rpes: Vec<f64> = loads.iter().filter_map(|load| load.rpe).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_intensity = if rpes.is_empty() {
            None
        } else {
            Some(rpes.iter().sum::<f64>() / rpes.len() as f64)
        };

        let rolling = self.analyzer.analyze(series, week + Duration::days(6));

        TrainingLoadRecord {
            user_id,
            week_start_date: week,
            total_volume,
            total_sets,
            total_reps,
            average_intensity,
            training_days: u32::try_from(training_days.len()).unwrap_or(u32::MAX),
            total_duration,
            acute_load: rolling.acute_load,
            chronic_load: rolling.chronic_load,
            load_ratio: rolling.load_ratio,
            risk_band: None,
            calculated_at,
        }
    }
}
