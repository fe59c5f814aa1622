// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, test configuration, fixtures and tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `fitcoach_analytics`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use axum::Router;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use fitcoach_analytics::{
    auth::AuthManager,
    config::{
        AnalyticsConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel,
        SecurityConfig, ServerConfig,
    },
    database::Database,
    models::{ConnectionStatus, ExerciseLog, SessionStatus, SetLog, User, UserRole, WorkoutSession},
    resources::ServerResources,
    routes,
};
use std::env;
use std::sync::{Arc, Once};
use std::time::Duration as StdDuration;
use uuid::Uuid;

/// Secret shared by the test auth manager and token helpers
pub const TEST_JWT_SECRET: &str = "fitcoach-integration-test-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration for tests: in-memory database, default analytics tuning
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
            auto_migrate: true,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            jwt_expiry_hours: 24,
        },
        analytics: AnalyticsConfig::default(),
        security: SecurityConfig {
            cors_origins: vec!["*".to_owned()],
            request_timeout: StdDuration::from_secs(30),
        },
    }
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new(&DatabaseUrl::Memory, 1).await?;
    database.migrate().await?;
    Ok(Arc::new(database))
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET.as_bytes(), 24)
}

/// Everything a route test needs
pub struct TestApp {
    /// Backing database for fixtures
    pub database: Arc<Database>,
    /// Shared resources the router was built from
    pub resources: Arc<ServerResources>,
    /// Token issuer matching the router's verifier
    pub auth: AuthManager,
}

impl TestApp {
    /// App over a fresh in-memory database with default configuration
    pub async fn new() -> Result<Self> {
        Self::with_config(test_config()).await
    }

    /// App over a fresh in-memory database with custom configuration
    pub async fn with_config(config: ServerConfig) -> Result<Self> {
        let database = create_test_database().await?;
        let resources = Arc::new(ServerResources::new(
            database.clone(),
            create_test_auth_manager(),
            Arc::new(config),
        ));
        Ok(Self {
            database,
            resources,
            auth: create_test_auth_manager(),
        })
    }

    /// Router over this app's resources
    pub fn router(&self) -> Router {
        routes::router(self.resources.clone())
    }

    /// Bearer token for `user`
    pub fn token(&self, user: &User) -> String {
        self.auth.generate_token(user).expect("token")
    }

    /// Create a user with `role`
    pub async fn user(&self, email: &str, role: UserRole) -> User {
        create_user(&self.database, email, role).await
    }

    /// Connect `client` to `trainer`
    pub async fn connect(&self, trainer: &User, client: &User, status: ConnectionStatus) {
        self.database
            .connect_client(trainer.id, client.id, status, Utc::now())
            .await
            .expect("connect client");
    }
}

/// Insert a user
pub async fn create_user(database: &Database, email: &str, role: UserRole) -> User {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        role,
        is_active: true,
        created_at: Utc::now(),
    };
    database.create_user(&user).await.expect("create user");
    user
}

/// A completed session ending at `ended_at` with one exercise of `sets`
/// (reps, weight) pairs
pub fn completed_session(
    user_id: Uuid,
    ended_at: DateTime<Utc>,
    sets: &[(u32, f64)],
) -> WorkoutSession {
    WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        trainer_id: None,
        status: SessionStatus::Completed,
        scheduled_date: ended_at.date_naive(),
        actual_start_time: Some(ended_at - Duration::hours(1)),
        actual_end_time: Some(ended_at),
        total_volume: None,
        completed_sets: None,
        average_rpe: None,
        exercise_logs: vec![ExerciseLog {
            exercise_id: None,
            set_logs: (1_u32..)
                .zip(sets)
                .map(|(set_number, &(reps, weight))| SetLog {
                    set_number,
                    completed: true,
                    actual_reps: Some(reps),
                    weight: Some(weight),
                })
                .collect(),
        }],
    }
}

/// Noon UTC `days_ago` days before today
pub fn days_ago_at_noon(days_ago: i64) -> DateTime<Utc> {
    (Utc::now().date_naive() - Duration::days(days_ago))
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("noon"))
        .and_utc()
}

/// Store a completed session for each entry of `days_ago`
pub async fn complete_sessions_on(database: &Database, user_id: Uuid, days_ago: &[i64]) {
    for &days in days_ago {
        // Today's session ends now when noon has not come yet
        let ended_at = days_ago_at_noon(days).min(Utc::now());
        database
            .insert_session(&completed_session(user_id, ended_at, &[(10, 50.0)]))
            .await
            .expect("insert session");
    }
}
