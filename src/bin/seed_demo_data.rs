// ABOUTME: Demo data seeder for the fitcoach analytics dashboards
// ABOUTME: Generates reproducible users, sessions, metrics and measurements from a seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Demo data seeder for Fitcoach Analytics.
//!
//! Populates the database with one admin, one trainer and two clients, a
//! few weeks of completed sessions, some performance metrics and a body
//! measurement, then prints a bearer token for each user.
//!
//! Usage:
//! ```bash
//! # Seed the configured database
//! cargo run --bin seed-demo-data
//!
//! # Eight weeks of history with a different random seed
//! cargo run --bin seed-demo-data -- --weeks 8 --seed 7
//!
//! # Verbose output
//! cargo run --bin seed-demo-data -- -v
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use clap::Parser;
use fitcoach_analytics::auth::AuthManager;
use fitcoach_analytics::config::{DatabaseUrl, LogLevel, ServerConfig};
use fitcoach_analytics::database::repositories::{MeasurementStore, PerformanceMetricStore};
use fitcoach_analytics::database::Database;
use fitcoach_analytics::logging;
use fitcoach_analytics::models::{
    ConnectionStatus, ExerciseLog, MetricType, NewBodyMeasurement, NewPerformanceMetric,
    SessionStatus, SetLog, User, UserRole, WorkoutSession,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map};
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Fitcoach Analytics Demo Data Seeder",
    long_about = "Populate the database with reproducible demo data for dashboard testing"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Weeks of session history to generate
    #[arg(long, default_value = "6")]
    weeks: u32,

    /// Random seed; the same seed produces the same history
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Demo user configuration
struct DemoUser {
    email: &'static str,
    role: UserRole,
    /// Probability of training on any given day
    consistency: f64,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        email: "admin@fitcoach.demo",
        role: UserRole::Admin,
        consistency: 0.0,
    },
    DemoUser {
        email: "coach.rivera@fitcoach.demo",
        role: UserRole::Trainer,
        consistency: 0.0,
    },
    DemoUser {
        email: "jamie.chen@fitcoach.demo",
        role: UserRole::Client,
        consistency: 0.7,
    },
    DemoUser {
        email: "sam.okafor@fitcoach.demo",
        role: UserRole::Client,
        consistency: 0.3,
    },
];

/// Catalog exercises with a starting working weight in kilograms
const DEMO_EXERCISES: &[(&str, f64)] = &[("Squat", 80.0), ("Bench Press", 60.0), ("Deadlift", 100.0)];

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url);
    }
    if args.verbose {
        config.log_level = LogLevel::Debug;
    }
    logging::init(&config)?;

    info!("Seeding {} with {} weeks of history", config.database.url, args.weeks);
    let database = Database::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to open database")?;
    database.migrate().await.context("Failed to migrate database")?;

    let auth = AuthManager::new(config.auth.jwt_secret.as_bytes(), config.auth.jwt_expiry_hours);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let now = Utc::now();

    let users = create_users(&database, now).await?;
    let trainer = users
        .iter()
        .find(|user| user.role == UserRole::Trainer)
        .context("Demo data has no trainer")?;

    let mut exercises = Vec::with_capacity(DEMO_EXERCISES.len());
    for (name, base_weight) in DEMO_EXERCISES {
        let id = Uuid::new_v4();
        database.create_exercise(id, name).await?;
        exercises.push((id, *base_weight));
    }

    for (user, demo) in users.iter().zip(DEMO_USERS) {
        if user.role != UserRole::Client {
            continue;
        }
        database
            .connect_client(
                trainer.id,
                user.id,
                ConnectionStatus::Active,
                now - Duration::weeks(i64::from(args.weeks)),
            )
            .await?;

        let sessions =
            seed_sessions(&database, &mut rng, user.id, trainer.id, &exercises, demo, args.weeks, now)
                .await?;
        seed_metrics(&database, &mut rng, user.id, &exercises, now).await?;
        seed_measurement(&database, &mut rng, user.id, now).await?;
        info!(email = %user.email, sessions, "Seeded client history");
    }

    info!("Demo bearer tokens:");
    for user in &users {
        let token = auth.generate_token(user)?;
        info!("  {} ({}): {}", user.email, user.role, token);
    }

    database.close().await;
    info!("Demo data seeded");
    Ok(())
}

async fn create_users(database: &Database, now: DateTime<Utc>) -> Result<Vec<User>> {
    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for (offset, demo) in (0_i64..).zip(DEMO_USERS) {
        let user = User {
            id: Uuid::new_v4(),
            email: demo.email.to_owned(),
            role: demo.role,
            is_active: true,
            created_at: now - Duration::days(90 - offset),
        };
        database
            .create_user(&user)
            .await
            .with_context(|| format!("Failed to create {}", demo.email))?;
        users.push(user);
    }
    Ok(users)
}

#[allow(clippy::too_many_arguments)]
async fn seed_sessions(
    database: &Database,
    rng: &mut StdRng,
    user_id: Uuid,
    trainer_id: Uuid,
    exercises: &[(Uuid, f64)],
    demo: &DemoUser,
    weeks: u32,
    now: DateTime<Utc>,
) -> Result<u32> {
    let days = i64::from(weeks) * 7;
    let mut created = 0;

    for days_ago in (0..days).rev() {
        if !rng.gen_bool(demo.consistency) {
            continue;
        }

        let day = (now - Duration::days(days_ago)).date_naive();
        let start_hour = rng.gen_range(6..20);
        let start = day
            .and_time(NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN))
            .and_utc();
        let end = start + Duration::minutes(rng.gen_range(40..90));
        if end > now {
            continue;
        }

        // Working weights creep up over the history
        #[allow(clippy::cast_precision_loss)]
        let progression = 1.0 + (days - days_ago) as f64 / days as f64 * 0.1;
        let exercise_logs = exercises
            .iter()
            .map(|(exercise_id, base_weight)| ExerciseLog {
                exercise_id: Some(*exercise_id),
                set_logs: (1..=3)
                    .map(|set_number| SetLog {
                        set_number,
                        completed: rng.gen_bool(0.9),
                        actual_reps: Some(rng.gen_range(5..=10)),
                        weight: Some((base_weight * progression).round()),
                    })
                    .collect(),
            })
            .collect();

        let session = WorkoutSession {
            id: Uuid::new_v4(),
            user_id,
            trainer_id: Some(trainer_id),
            status: SessionStatus::Completed,
            scheduled_date: day,
            actual_start_time: Some(start),
            actual_end_time: Some(end),
            total_volume: None,
            completed_sets: None,
            average_rpe: Some(f64::from(rng.gen_range(60..90_u32)) / 10.0),
            exercise_logs,
        };
        database.insert_session(&session).await?;
        created += 1;
    }

    Ok(created)
}

async fn seed_metrics(
    database: &Database,
    rng: &mut StdRng,
    user_id: Uuid,
    exercises: &[(Uuid, f64)],
    now: DateTime<Utc>,
) -> Result<()> {
    for (exercise_id, base_weight) in exercises {
        for weeks_ago in [4_i64, 2, 0] {
            let value = (base_weight * rng.gen_range(1.1..1.3)).round();
            let metric = NewPerformanceMetric {
                exercise_id: Some(*exercise_id),
                metric_type: MetricType::OneRm,
                value,
                unit: "kg".to_owned(),
                recorded_at: None,
                workout_session_id: None,
                notes: None,
            };
            database
                .insert_metric(user_id, &metric, now - Duration::weeks(weeks_ago))
                .await?;
        }
    }
    Ok(())
}

async fn seed_measurement(
    database: &Database,
    rng: &mut StdRng,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut measurements = Map::new();
    measurements.insert("waist".to_owned(), json!(rng.gen_range(75..95)));
    measurements.insert("chest".to_owned(), json!(rng.gen_range(90..110)));

    let measurement = NewBodyMeasurement {
        recorded_at: None,
        weight: Some(f64::from(rng.gen_range(600..950_u32)) / 10.0),
        body_fat_percentage: Some(f64::from(rng.gen_range(120..280_u32)) / 10.0),
        muscle_mass: None,
        measurements,
        notes: Some("Demo snapshot".to_owned()),
    };
    database
        .insert_measurement(user_id, &measurement, now - Duration::days(1))
        .await?;
    Ok(())
}
