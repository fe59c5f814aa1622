// ABOUTME: Integration tests for the SQLite datastore and its repository traits
// ABOUTME: Runs against an on-disk database in a temporary directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use common::{completed_session, create_user};
use fitcoach_analytics::config::{DatabaseConfig, DatabaseUrl};
use fitcoach_analytics::database::repositories::{
    CompletionRange, DirectoryStore, SessionSource, TrainingLoadStore,
};
use fitcoach_analytics::database::Database;
use fitcoach_analytics::models::{
    ConnectionStatus, SessionStatus, TrainingLoadRecord, UserRole,
};
use tempfile::TempDir;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// On-disk database inside a nested directory that does not exist yet
async fn on_disk_database() -> (TempDir, Database) {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("analytics.db");
    let database = Database::from_config(&DatabaseConfig {
        url: DatabaseUrl::SQLite { path: path.clone() },
        max_connections: 4,
        auto_migrate: true,
    })
    .await
    .unwrap();
    assert!(path.exists());
    (dir, database)
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let (_dir, database) = on_disk_database().await;
    database.migrate().await.unwrap();
    database.migrate().await.unwrap();
    database.close().await;
}

#[tokio::test]
async fn test_completed_sessions_round_trip_with_set_logs() {
    let (_dir, database) = on_disk_database().await;
    let user = create_user(&database, "logs@fitcoach.test", UserRole::Client).await;

    database
        .insert_session(&completed_session(
            user.id,
            at(2024, 6, 4, 12),
            &[(10, 50.0), (8, 60.0)],
        ))
        .await
        .unwrap();
    database
        .insert_session(&completed_session(user.id, at(2024, 6, 20, 12), &[(5, 100.0)]))
        .await
        .unwrap();

    let mut planned = completed_session(user.id, at(2024, 6, 5, 12), &[(5, 100.0)]);
    planned.status = SessionStatus::Planned;
    planned.actual_start_time = None;
    planned.actual_end_time = None;
    database.insert_session(&planned).await.unwrap();

    let all = database
        .completed_sessions(user.id, CompletionRange::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].actual_end_time < all[1].actual_end_time);
    assert_eq!(all[0].exercise_logs.len(), 1);
    let sets = &all[0].exercise_logs[0].set_logs;
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].actual_reps, Some(10));
    assert_eq!(sets[1].weight, Some(60.0));

    let june_first_half = database
        .completed_sessions(
            user.id,
            CompletionRange {
                start: Some(at(2024, 6, 1, 0)),
                end: Some(at(2024, 6, 15, 0)),
            },
        )
        .await
        .unwrap();
    assert_eq!(june_first_half.len(), 1);
    assert_eq!(june_first_half[0].completed_on(), Some(date(2024, 6, 4)));

    assert_eq!(database.count_completed_sessions(user.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_completion_dates_are_distinct_and_scoped() {
    let (_dir, database) = on_disk_database().await;
    let user = create_user(&database, "dates@fitcoach.test", UserRole::Client).await;
    let other = create_user(&database, "other@fitcoach.test", UserRole::Client).await;

    for ended_at in [
        at(2024, 6, 3, 7),
        at(2024, 6, 3, 19),
        at(2024, 6, 4, 12),
        at(2024, 5, 1, 12),
    ] {
        database
            .insert_session(&completed_session(user.id, ended_at, &[(5, 20.0)]))
            .await
            .unwrap();
    }
    database
        .insert_session(&completed_session(other.id, at(2024, 6, 5, 12), &[(5, 20.0)]))
        .await
        .unwrap();

    let mut dates = database
        .completion_dates(user.id, at(2024, 6, 1, 0))
        .await
        .unwrap();
    dates.sort_unstable();
    assert_eq!(dates, vec![date(2024, 6, 3), date(2024, 6, 4)]);
}

#[tokio::test]
async fn test_training_load_upsert_replaces_week() {
    let (_dir, database) = on_disk_database().await;
    let user = create_user(&database, "loads@fitcoach.test", UserRole::Client).await;
    let week = date(2024, 6, 3);

    let mut record = TrainingLoadRecord {
        user_id: user.id,
        week_start_date: week,
        total_volume: 1000.0,
        total_sets: 10,
        total_reps: 80,
        average_intensity: None,
        training_days: 2,
        total_duration: 3600,
        acute_load: 1000.0,
        chronic_load: 0.0,
        load_ratio: None,
        risk_band: None,
        calculated_at: at(2024, 6, 10, 8),
    };
    database.upsert_training_load(&record).await.unwrap();

    record.total_volume = 1480.0;
    record.chronic_load = 370.0;
    record.load_ratio = Some(4.0);
    record.risk_band = Some("high".to_owned());
    database.upsert_training_load(&record).await.unwrap();

    let stored = database
        .get_training_load(user.id, week)
        .await
        .unwrap()
        .unwrap();
    assert!((stored.total_volume - 1480.0).abs() < f64::EPSILON);
    assert_eq!(stored.load_ratio, Some(4.0));
    assert_eq!(stored.risk_band.as_deref(), Some("high"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM training_loads WHERE user_id = $1")
        .bind(user.id.to_string())
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);

    assert!(database
        .get_training_load(user.id, week + Duration::weeks(1))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_directory_counts_skip_archived_connections() {
    let (_dir, database) = on_disk_database().await;
    let trainer = create_user(&database, "coach@fitcoach.test", UserRole::Trainer).await;
    let admin = create_user(&database, "root@fitcoach.test", UserRole::Admin).await;
    let now = Utc::now();
    let long_ago = now - Duration::days(120);

    let mut clients = Vec::new();
    for (index, (status, connected_at)) in [
        (ConnectionStatus::Active, now),
        (ConnectionStatus::Active, long_ago),
        (ConnectionStatus::Inactive, long_ago),
        (ConnectionStatus::Archived, now),
    ]
    .into_iter()
    .enumerate()
    {
        let client = create_user(&database, &format!("c{index}@fitcoach.test"), UserRole::Client).await;
        database
            .connect_client(trainer.id, client.id, status, connected_at)
            .await
            .unwrap();
        clients.push(client);
    }

    let month_start = now - Duration::days(20);
    let counts = database.client_counts(trainer.id, month_start).await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.active, 2);
    assert_eq!(counts.new_this_month, 1);

    let listed = database.list_clients(trainer.id, 10).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].client_id, clients[0].id);
    assert!(listed.iter().all(|c| c.status != ConnectionStatus::Archived));
    assert_eq!(database.list_clients(trainer.id, 1).await.unwrap().len(), 1);

    let archived = database
        .get_connection(trainer.id, clients[3].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(archived.status, ConnectionStatus::Archived);
    assert!(database
        .get_connection(admin.id, clients[0].id)
        .await
        .unwrap()
        .is_none());

    let roles = database.role_counts().await.unwrap();
    assert_eq!(roles.total_users, 6);
    assert_eq!(roles.trainers, 1);
    assert_eq!(roles.clients, 4);

    assert!(database.get_user(Uuid::new_v4()).await.unwrap().is_none());
    let found = database.get_user(trainer.id).await.unwrap().unwrap();
    assert_eq!(found.role, UserRole::Trainer);
}

#[tokio::test]
async fn test_duplicate_connection_rejected() {
    let (_dir, database) = on_disk_database().await;
    let trainer = create_user(&database, "coach@fitcoach.test", UserRole::Trainer).await;
    let client = create_user(&database, "dup@fitcoach.test", UserRole::Client).await;

    database
        .connect_client(trainer.id, client.id, ConnectionStatus::Active, Utc::now())
        .await
        .unwrap();
    assert!(database
        .connect_client(trainer.id, client.id, ConnectionStatus::Pending, Utc::now())
        .await
        .is_err());
}
