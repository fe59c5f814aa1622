// ABOUTME: Progress report figures over the sessions scheduled in a period
// ABOUTME: Completion rate counts every scheduled session, the rest only completed ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::load_aggregator::SessionLoad;
use fitcoach_core::models::{ReportSummary, ReportWorkout, WorkoutSession};

/// Progress report summariser
///
/// Sessions are taken as scheduled in the reporting period. Skipped and
/// planned sessions still count towards `total_workouts` so the completion
/// rate reflects adherence to the plan.
pub struct ProgressSummarizer;

impl ProgressSummarizer {
    /// Headline figures for `sessions`
    #[must_use]
    pub fn summarize(sessions: &[WorkoutSession]) -> ReportSummary {
        let loads: Vec<SessionLoad> = sessions.iter().filter_map(SessionLoad::from_session).collect();

        let total = u32::try_from(sessions.len()).unwrap_or(u32::MAX);
        let completed = u32::try_from(loads.len()).unwrap_or(u32::MAX);

        let total_volume: f64 = loads.iter().map(|load| load.volume).sum();
        let total_duration_secs: i64 = loads.iter().map(|load| load.duration_secs).sum();

        let rpes: Vec<f64> = loads.iter().filter_map(|load| load.rpe).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_rpe = if rpes.is_empty() {
            None
        } else {
            Some(round_to(rpes.iter().sum::<f64>() / rpes.len() as f64, 1))
        };

        ReportSummary {
            total_workouts: total,
            completed_workouts: completed,
            completion_rate: completion_rate(completed, total),
            total_duration_minutes: total_duration_secs / 60,
            total_volume: round_to(total_volume, 2),
            average_rpe,
        }
    }

    /// One listing row per session, oldest scheduled date first
    #[must_use]
    pub fn workouts(sessions: &[WorkoutSession]) -> Vec<ReportWorkout> {
        let mut rows: Vec<(&WorkoutSession, ReportWorkout)> = sessions
            .iter()
            .map(|session| {
                let load = SessionLoad::from_session(session);
                let row = ReportWorkout {
                    date: session.scheduled_date,
                    status: session.status,
                    duration_minutes: load.as_ref().map(|load| load.duration_secs / 60),
                    volume: load.as_ref().map(|load| round_to(load.volume, 2)),
                    completed_sets: load.as_ref().map(|load| load.sets),
                };
                (session, row)
            })
            .collect();
        rows.sort_by(|(a, _), (b, _)| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

/// Completed share of `total` in whole percent, halves rounded up
fn completion_rate(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (u64::from(completed) * 200 + u64::from(total)) / (2 * u64::from(total));
    u32::try_from(rate).unwrap_or(u32::MAX)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
