// ABOUTME: Consecutive-day streak detection over completed session dates
// ABOUTME: Reports the most recent unbroken run, not whether the user trained today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use chrono::NaiveDate;
use fitcoach_core::models::WorkoutSession;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of the most recent unbroken run of training days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    /// Number of consecutive calendar days in the run
    pub length: u32,
    /// Latest day of the run, absent when there are no completed days
    pub most_recent_date: Option<NaiveDate>,
}

/// Streak calculator
///
/// Dates are scanned newest first and split into runs wherever two neighbours
/// are more than one day apart. The reported run is the one containing the
/// most recent day. The one exception is a most recent day that stands alone:
/// if the run just before it spans at least two days, that run is reported
/// instead, so a single session after a short break does not hide the run
/// the user just finished. Only that one isolated day is bridged.
///
/// Staleness is not considered: a user who trained three days in a row and then
/// stopped a week ago still has a streak of 3. Callers that want "active as of
/// today" semantics compare `most_recent_date` against the current date.
pub struct StreakCalculator;

impl StreakCalculator {
    /// Compute the streak from completion dates
    ///
    /// Duplicates and ordering of `dates` do not matter.
    #[must_use]
    pub fn calculate<I>(dates: I) -> StreakResult
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut days: Vec<NaiveDate> = dates.into_iter().collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.dedup();

        let Some((latest, older)) = Self::leading_run(&days) else {
            return StreakResult::default();
        };
        if latest.length > 1 {
            return latest;
        }

        match Self::leading_run(older) {
            Some((previous, _)) if previous.length > 1 => {
                debug!(
                    isolated_day = ?latest.most_recent_date,
                    run_end = ?previous.most_recent_date,
                    run_length = previous.length,
                    "Bridging isolated latest day to preceding run"
                );
                previous
            }
            _ => latest,
        }
    }

    /// Compute the streak from sessions, ignoring anything not completed
    #[must_use]
    pub fn from_sessions(sessions: &[WorkoutSession]) -> StreakResult {
        Self::calculate(sessions.iter().filter_map(WorkoutSession::completed_on))
    }

    /// Split the run at the head of newest-first, deduplicated `days`
    fn leading_run(days: &[NaiveDate]) -> Option<(StreakResult, &[NaiveDate])> {
        let &end = days.first()?;
        let length = 1 + days
            .windows(2)
            .take_while(|pair| (pair[0] - pair[1]).num_days() == 1)
            .count();
        let (_, rest) = days.split_at(length);

        Some((
            StreakResult {
                length: u32::try_from(length).unwrap_or(u32::MAX),
                most_recent_date: Some(end),
            },
            rest,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lone_recent_day_does_not_reset_run() {
        let result = StreakCalculator::calculate([
            date(2024, 6, 1),
            date(2024, 6, 2),
            date(2024, 6, 3),
            date(2024, 6, 5),
        ]);
        assert_eq!(result.length, 3);
        assert_eq!(result.most_recent_date, Some(date(2024, 6, 3)));
    }

    #[test]
    fn test_most_recent_multi_day_run_wins_over_longer_older_run() {
        let result = StreakCalculator::calculate([
            date(2024, 5, 1),
            date(2024, 5, 2),
            date(2024, 5, 3),
            date(2024, 5, 4),
            date(2024, 5, 10),
            date(2024, 5, 11),
        ]);
        assert_eq!(result.length, 2);
        assert_eq!(result.most_recent_date, Some(date(2024, 5, 11)));
    }

    #[test]
    fn test_run_is_reported_even_when_stale() {
        let result = StreakCalculator::calculate([
            date(2024, 6, 3),
            date(2024, 6, 1),
            date(2024, 6, 2),
        ]);
        assert_eq!(result.length, 3);
        assert_eq!(result.most_recent_date, Some(date(2024, 6, 3)));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(StreakCalculator::calculate([]), StreakResult::default());

        let single = StreakCalculator::calculate([date(2024, 1, 1)]);
        assert_eq!(single.length, 1);
        assert_eq!(single.most_recent_date, Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_only_isolated_days_reports_most_recent() {
        let result = StreakCalculator::calculate([
            date(2024, 1, 1),
            date(2024, 1, 5),
            date(2024, 1, 9),
        ]);
        assert_eq!(result.length, 1);
        assert_eq!(result.most_recent_date, Some(date(2024, 1, 9)));
    }

    #[test]
    fn test_only_one_isolated_day_is_bridged() {
        let result = StreakCalculator::calculate([
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 6, 1),
            date(2024, 6, 10),
            date(2024, 6, 20),
        ]);
        assert_eq!(result.length, 1);
        assert_eq!(result.most_recent_date, Some(date(2024, 6, 20)));
    }

    #[test]
    fn test_latest_multi_day_run_is_not_extended_backwards() {
        let result = StreakCalculator::calculate([
            date(2024, 3, 1),
            date(2024, 3, 2),
            date(2024, 3, 4),
            date(2024, 3, 5),
        ]);
        assert_eq!(result.length, 2);
        assert_eq!(result.most_recent_date, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_duplicate_days_count_once() {
        let result = StreakCalculator::calculate([
            date(2024, 2, 28),
            date(2024, 2, 29),
            date(2024, 2, 29),
            date(2024, 3, 1),
        ]);
        assert_eq!(result.length, 3);
    }
}
