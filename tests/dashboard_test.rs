// ABOUTME: End-to-end tests for the role-scoped dashboard endpoint
// ABOUTME: Covers client, trainer and admin payloads plus per-client failure isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use common::{complete_sessions_on, test_config, TestApp};
use fitcoach_analytics::database::repositories::{
    CompletionRange, MeasurementStore, SessionSource,
};
use fitcoach_analytics::database::Database;
use fitcoach_analytics::errors::DatabaseError;
use fitcoach_analytics::middleware::AuthenticatedUser;
use fitcoach_analytics::models::{
    ConnectionStatus, NewBodyMeasurement, UserRole, WorkoutSession,
};
use fitcoach_analytics::routes;
use fitcoach_analytics::services::{DashboardService, DashboardStats};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use uuid::Uuid;

/// How the fake source misbehaves for its target user
#[derive(Clone, Copy)]
enum Misbehavior {
    Fail,
    Stall,
}

/// Delegates to the database except for one user
struct UnreliableSessions {
    inner: Arc<Database>,
    target: Uuid,
    misbehavior: Misbehavior,
}

impl UnreliableSessions {
    async fn intercept(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        if user_id != self.target {
            return Ok(());
        }
        match self.misbehavior {
            Misbehavior::Fail => Err(DatabaseError::QueryError {
                context: "simulated outage".to_owned(),
            }),
            Misbehavior::Stall => {
                sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SessionSource for UnreliableSessions {
    async fn completed_sessions(
        &self,
        user_id: Uuid,
        range: CompletionRange,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        self.intercept(user_id).await?;
        self.inner.completed_sessions(user_id, range).await
    }

    async fn scheduled_sessions(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        self.intercept(user_id).await?;
        self.inner.scheduled_sessions(user_id, start, end).await
    }

    async fn completion_dates(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<NaiveDate>, DatabaseError> {
        self.intercept(user_id).await?;
        self.inner.completion_dates(user_id, since).await
    }

    async fn count_completed_sessions(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        self.intercept(user_id).await?;
        self.inner.count_completed_sessions(user_id).await
    }
}

fn assert_send<T: Send>(_: &T) {}

/// Lifetimes stay generic here, the way axum sees handler futures
fn stats_future_is_send(service: &DashboardService, caller: &AuthenticatedUser) {
    assert_send(&service.stats(caller, Utc::now()));
}

fn client_streak(dashboard: &Value, client_id: Uuid) -> u64 {
    dashboard["data"]["clients"]
        .as_array()
        .unwrap()
        .iter()
        .find(|client| client["id"] == client_id.to_string())
        .and_then(|client| client["workoutStreak"].as_u64())
        .expect("client listed on dashboard")
}

#[tokio::test]
async fn test_trainer_dashboard_reports_client_streaks() {
    let app = TestApp::new().await.unwrap();
    let trainer = app.user("coach@fitcoach.test", UserRole::Trainer).await;
    let steady = app.user("steady.eddie@fitcoach.test", UserRole::Client).await;
    let idle = app.user("idle@fitcoach.test", UserRole::Client).await;
    let gone = app.user("gone@fitcoach.test", UserRole::Client).await;
    app.connect(&trainer, &steady, ConnectionStatus::Active).await;
    app.connect(&trainer, &idle, ConnectionStatus::Pending).await;
    app.connect(&trainer, &gone, ConnectionStatus::Archived).await;
    complete_sessions_on(&app.database, steady.id, &[0, 1, 2]).await;

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&trainer))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["role"], "trainer");
    let overview = &json["data"]["clientOverview"];
    assert_eq!(overview["totalClients"], 2);
    assert_eq!(overview["activeClients"], 1);
    assert_eq!(overview["inactiveClients"], 1);
    assert_eq!(overview["newThisMonth"], 2);

    let clients = json["data"]["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(client_streak(&json, steady.id), 3);
    assert_eq!(client_streak(&json, idle.id), 0);

    let steady_entry = clients
        .iter()
        .find(|client| client["id"] == steady.id.to_string())
        .unwrap();
    assert_eq!(steady_entry["email"], "steady.eddie@fitcoach.test");
    assert_eq!(steady_entry["status"], "active");
    assert!(steady_entry["name"].as_str().is_some_and(|name| !name.is_empty()));
}

#[tokio::test]
async fn test_trainer_stats_run_on_spawned_task() {
    let app = TestApp::new().await.unwrap();
    let trainer = app.user("spawned@fitcoach.test", UserRole::Trainer).await;
    let client = app.user("runner@fitcoach.test", UserRole::Client).await;
    app.connect(&trainer, &client, ConnectionStatus::Active).await;
    complete_sessions_on(&app.database, client.id, &[0, 1]).await;

    let service = DashboardService::new(&app.resources);
    let caller = AuthenticatedUser {
        user_id: trainer.id,
        email: trainer.email.clone(),
        role: UserRole::Trainer,
    };
    stats_future_is_send(&service, &caller);

    let stats = tokio::spawn(async move { service.stats(&caller, Utc::now()).await })
        .await
        .unwrap()
        .unwrap();
    let DashboardStats::Trainer(dashboard) = stats else {
        panic!("trainer payload expected");
    };
    assert_eq!(dashboard.clients.len(), 1);
    assert_eq!(dashboard.clients[0].workout_streak, 2);
}

#[tokio::test]
async fn test_failing_client_query_reports_zero_streak() {
    let app = TestApp::new().await.unwrap();
    let trainer = app.user("coach@fitcoach.test", UserRole::Trainer).await;
    let broken = app.user("broken@fitcoach.test", UserRole::Client).await;
    let healthy = app.user("healthy@fitcoach.test", UserRole::Client).await;
    app.connect(&trainer, &broken, ConnectionStatus::Active).await;
    app.connect(&trainer, &healthy, ConnectionStatus::Active).await;
    complete_sessions_on(&app.database, broken.id, &[0, 1, 2, 3]).await;
    complete_sessions_on(&app.database, healthy.id, &[0, 1]).await;

    let resources = (*app.resources).clone().with_session_source(Arc::new(UnreliableSessions {
        inner: app.database.clone(),
        target: broken.id,
        misbehavior: Misbehavior::Fail,
    }));
    let router = routes::router(Arc::new(resources));

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&trainer))
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(client_streak(&json, broken.id), 0);
    assert_eq!(client_streak(&json, healthy.id), 2);
    assert_eq!(json["data"]["clientOverview"]["totalClients"], 2);
}

#[tokio::test]
async fn test_slow_client_query_is_cut_off_at_deadline() {
    let mut config = test_config();
    config.analytics.dashboard_deadline = Duration::from_millis(200);
    let app = TestApp::with_config(config).await.unwrap();
    let trainer = app.user("coach@fitcoach.test", UserRole::Trainer).await;
    let slow = app.user("slow@fitcoach.test", UserRole::Client).await;
    let quick = app.user("quick@fitcoach.test", UserRole::Client).await;
    app.connect(&trainer, &slow, ConnectionStatus::Active).await;
    app.connect(&trainer, &quick, ConnectionStatus::Active).await;
    complete_sessions_on(&app.database, slow.id, &[0, 1]).await;
    complete_sessions_on(&app.database, quick.id, &[1, 2, 3]).await;

    let resources = (*app.resources).clone().with_session_source(Arc::new(UnreliableSessions {
        inner: app.database.clone(),
        target: slow.id,
        misbehavior: Misbehavior::Stall,
    }));
    let router = routes::router(Arc::new(resources));

    let started = Instant::now();
    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&trainer))
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(client_streak(&json, slow.id), 0);
    assert_eq!(client_streak(&json, quick.id), 3);
}

#[tokio::test]
async fn test_client_dashboard_defaults_without_history() {
    let app = TestApp::new().await.unwrap();
    let client = app.user("newbie@fitcoach.test", UserRole::Client).await;

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&client))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(json["data"]["role"], "client");
    let summary = &json["data"]["progressSummary"];
    assert!(summary["currentWeight"].is_null());
    assert!(summary["measurements"].is_null());
    assert!(summary["lastMeasuredAt"].is_null());
    assert_eq!(summary["totalWorkouts"], 0);
    assert_eq!(summary["workoutStreak"], 0);
}

#[tokio::test]
async fn test_client_dashboard_reports_latest_measurement_and_workouts() {
    let app = TestApp::new().await.unwrap();
    let client = app.user("regular@fitcoach.test", UserRole::Client).await;
    complete_sessions_on(&app.database, client.id, &[1, 2, 10]).await;

    let mut measurements = Map::new();
    measurements.insert("waist".to_owned(), json!(86));
    for (weight, days_ago) in [(84.0, 20), (82.5, 2)] {
        app.database
            .insert_measurement(
                client.id,
                &NewBodyMeasurement {
                    recorded_at: None,
                    weight: Some(weight),
                    body_fat_percentage: None,
                    muscle_mass: None,
                    measurements: measurements.clone(),
                    notes: None,
                },
                Utc::now() - ChronoDuration::days(days_ago),
            )
            .await
            .unwrap();
    }

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&client))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    let summary = &json["data"]["progressSummary"];
    assert_eq!(summary["currentWeight"], 82.5);
    assert_eq!(summary["measurements"]["waist"], 86);
    assert!(summary["lastMeasuredAt"].is_string());
    assert_eq!(summary["totalWorkouts"], 3);
    assert_eq!(summary["workoutStreak"], 2);
}

#[tokio::test]
async fn test_admin_dashboard_counts_users() {
    let app = TestApp::new().await.unwrap();
    let admin = app.user("root@fitcoach.test", UserRole::Admin).await;
    app.user("coach@fitcoach.test", UserRole::Trainer).await;
    for index in 0..6 {
        app.user(&format!("client{index}@fitcoach.test"), UserRole::Client)
            .await;
    }

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&admin))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    let data = &json["data"];
    assert_eq!(data["role"], "admin");
    assert_eq!(data["totalUsers"], 8);
    assert_eq!(data["totalTrainers"], 1);
    assert_eq!(data["totalClients"], 6);
    let signups = data["recentSignups"].as_array().unwrap();
    assert_eq!(signups.len(), 5);
    assert!(signups.iter().all(|signup| signup["email"].is_string()));
}

#[tokio::test]
async fn test_dashboard_requires_authentication() {
    let app = TestApp::new().await.unwrap();

    let json: Value = AxumTestRequest::get("/api/dashboard-stats")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();

    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_request_over_time_budget_gets_error_envelope() {
    let mut config = test_config();
    config.security.request_timeout = Duration::from_millis(100);
    let app = TestApp::with_config(config).await.unwrap();
    let client = app.user("stalled@fitcoach.test", UserRole::Client).await;

    let resources = (*app.resources).clone().with_session_source(Arc::new(UnreliableSessions {
        inner: app.database.clone(),
        target: client.id,
        misbehavior: Misbehavior::Stall,
    }));
    let router = routes::router(Arc::new(resources));

    let started = Instant::now();
    let response = AxumTestRequest::get("/api/dashboard-stats")
        .bearer(&app.token(&client))
        .send(router)
        .await
        .assert_status(StatusCode::REQUEST_TIMEOUT);

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(response.request_id().is_some());
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "REQUEST_TIMEOUT");
}
