// ABOUTME: Integration tests for streak, weekly load and rolling load analytics
// ABOUTME: Exercises the public API with realistic multi-week session histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fitcoach_core::models::{SessionStatus, WorkoutSession};
use fitcoach_intelligence::{
    week_start, LoadAggregator, RiskBandPolicy, RollingLoadAnalyzer, StreakCalculator,
};
use uuid::Uuid;

fn session(user_id: Uuid, end: DateTime<Utc>, volume: f64, status: SessionStatus) -> WorkoutSession {
    WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        trainer_id: None,
        status,
        scheduled_date: end.date_naive(),
        actual_start_time: Some(end - Duration::hours(1)),
        actual_end_time: Some(end),
        total_volume: Some(volume),
        completed_sets: Some(12),
        average_rpe: Some(7.0),
        exercise_logs: Vec::new(),
    }
}

fn noon(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

#[test]
fn test_streak_from_sessions_ignores_skipped_days() {
    let user = Uuid::new_v4();
    let today = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
    let sessions: Vec<WorkoutSession> = (0..3)
        .map(|offset| {
            session(
                user,
                noon(today - Duration::days(offset)),
                1_000.0,
                SessionStatus::Completed,
            )
        })
        .chain(std::iter::once(session(
            user,
            noon(today - Duration::days(3)),
            1_000.0,
            SessionStatus::Skipped,
        )))
        .collect();

    let streak = StreakCalculator::from_sessions(&sessions);

    assert_eq!(streak.length, 3);
    assert_eq!(streak.most_recent_date, Some(today));
}

#[test]
fn test_streak_json_shape() {
    let streak = StreakCalculator::calculate([NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()]);
    let json = serde_json::to_value(streak).unwrap();
    assert_eq!(json["length"], 1);
    assert_eq!(json["mostRecentDate"], "2024-06-01");
}

#[test]
fn test_steady_training_converges_to_unit_ratio() {
    let user = Uuid::new_v4();
    let first_monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    // Monday, Wednesday and Friday sessions for eight weeks
    let sessions: Vec<WorkoutSession> = (0..8)
        .flat_map(|week| [0, 2, 4].map(move |day| week * 7 + day))
        .map(|offset| {
            session(
                user,
                noon(first_monday + Duration::days(offset)),
                1_000.0,
                SessionStatus::Completed,
            )
        })
        .collect();

    let records = LoadAggregator::new().aggregate(user, &sessions, noon(first_monday));

    assert_eq!(records.len(), 8);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].week_start_date < pair[1].week_start_date));

    // first week has no history: chronic averages in three empty weeks
    let first = &records[0];
    assert!((first.acute_load - 3_000.0).abs() < 1e-9);
    assert!((first.chronic_load - 750.0).abs() < 1e-9);
    assert!((first.load_ratio.unwrap() - 4.0).abs() < 1e-9);

    // from the fourth week on the windows are full
    for record in &records[3..] {
        assert_eq!(record.training_days, 3);
        assert_eq!(record.total_sets, 36);
        assert!((record.load_ratio.unwrap() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_records_are_week_aligned_and_unique() {
    let user = Uuid::new_v4();
    let dates = ["2024-03-03", "2024-03-04", "2024-03-10", "2024-03-11"];
    let sessions: Vec<WorkoutSession> = dates
        .iter()
        .map(|d| {
            session(
                user,
                noon(d.parse().unwrap()),
                500.0,
                SessionStatus::Completed,
            )
        })
        .collect();

    let records = LoadAggregator::new().aggregate(user, &sessions, noon(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()));

    let weeks: Vec<NaiveDate> = records.iter().map(|r| r.week_start_date).collect();
    assert_eq!(
        weeks,
        vec![
            NaiveDate::from_ymd_opt(2024, 2, 26).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
        ]
    );
    assert!(weeks.iter().all(|w| week_start(*w) == *w));
}

#[test]
fn test_custom_windows_flow_through_aggregator() {
    let user = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let sessions = vec![session(user, noon(monday), 1_400.0, SessionStatus::Completed)];

    let aggregator = LoadAggregator::with_analyzer(RollingLoadAnalyzer::with_windows(14, 56));
    let record = aggregator.aggregate_week(user, monday, &sessions, noon(monday));

    // 1400 over two weeks and over eight weeks
    assert!((record.acute_load - 700.0).abs() < 1e-9);
    assert!((record.chronic_load - 175.0).abs() < 1e-9);
}

#[test]
fn test_risk_policy_labels_ratio() {
    let policy: RiskBandPolicy = "under:0.8,sweet:1.3,caution:1.5,danger".parse().unwrap();
    let ratio = RollingLoadAnalyzer::load_ratio(14.0, 7.0).unwrap();
    assert_eq!(policy.classify(ratio), "danger");
    assert_eq!(policy.bands().len(), 4);
}
