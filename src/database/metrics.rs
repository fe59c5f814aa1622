// ABOUTME: Append-only performance metric storage and personal best queries
// ABOUTME: Filters are bound parameters, never concatenated into SQL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::PerformanceMetricStore;
use super::{parse_enum, parse_optional_uuid, parse_uuid, Database};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitcoach_core::constants::metrics::UNKNOWN_EXERCISE_NAME;
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{MetricQuery, NewPerformanceMetric, PerformanceMetric, PersonalBest};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use uuid::Uuid;

const METRIC_COLUMNS: &str = r"
    pm.id, pm.user_id, pm.exercise_id, e.name AS exercise_name, pm.metric_type,
    pm.value, pm.unit, pm.recorded_at, pm.workout_session_id, pm.notes
";

impl Database {
    /// Create the `performance_metrics` table
    pub(super) async fn migrate_metrics(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create performance_metrics",
            r"
            CREATE TABLE IF NOT EXISTS performance_metrics (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                exercise_id TEXT REFERENCES exercises(id) ON DELETE SET NULL,
                metric_type TEXT NOT NULL,
                value REAL NOT NULL CHECK (value > 0),
                unit TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                workout_session_id TEXT,
                notes TEXT
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index performance_metrics",
            "CREATE INDEX IF NOT EXISTS idx_performance_metrics_user ON performance_metrics(user_id, recorded_at)",
        )
        .await
    }

    /// Append a metric inside an open transaction
    pub(super) async fn insert_metric_tx(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
        metric: &NewPerformanceMetric,
        recorded_at: DateTime<Utc>,
    ) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO performance_metrics (
                id, user_id, exercise_id, metric_type, value, unit,
                recorded_at, workout_session_id, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(metric.exercise_id.map(|e| e.to_string()))
        .bind(metric.metric_type.as_str())
        .bind(metric.value)
        .bind(&metric.unit)
        .bind(recorded_at)
        .bind(metric.workout_session_id.map(|s| s.to_string()))
        .bind(metric.notes.as_deref())
        .execute(&mut **tx)
        .await?;
        Ok(id)
    }

    async fn get_metric(&self, id: Uuid) -> Result<PerformanceMetric, DatabaseError> {
        let sql = format!(
            "SELECT {METRIC_COLUMNS} FROM performance_metrics pm \
             LEFT JOIN exercises e ON e.id = pm.exercise_id WHERE pm.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity_type: "Performance metric",
                entity_id: id.to_string(),
            })?;
        Self::row_to_metric(&row)
    }

    fn row_to_metric(row: &SqliteRow) -> Result<PerformanceMetric, DatabaseError> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let metric_type: String = row.get("metric_type");
        Ok(PerformanceMetric {
            id: parse_uuid("performance_metrics", "id", &id)?,
            user_id: parse_uuid("performance_metrics", "user_id", &user_id)?,
            exercise_id: parse_optional_uuid(
                "performance_metrics",
                "exercise_id",
                row.get("exercise_id"),
            )?,
            exercise_name: row.get("exercise_name"),
            metric_type: parse_enum("performance_metrics", "metric_type", &metric_type)?,
            value: row.get("value"),
            unit: row.get("unit"),
            recorded_at: row.get("recorded_at"),
            workout_session_id: parse_optional_uuid(
                "performance_metrics",
                "workout_session_id",
                row.get("workout_session_id"),
            )?,
            notes: row.get("notes"),
        })
    }
}

#[async_trait]
impl PerformanceMetricStore for Database {
    async fn exercise_name(&self, exercise_id: Uuid) -> Result<Option<String>, DatabaseError> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM exercises WHERE id = $1")
            .bind(exercise_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }

    async fn insert_metric(
        &self,
        user_id: Uuid,
        metric: &NewPerformanceMetric,
        recorded_at: DateTime<Utc>,
    ) -> Result<PerformanceMetric, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let id = Self::insert_metric_tx(&mut tx, user_id, metric, recorded_at).await?;
        tx.commit().await?;
        self.get_metric(id).await
    }

    async fn query_metrics(
        &self,
        user_id: Uuid,
        query: &MetricQuery,
    ) -> Result<Vec<PerformanceMetric>, DatabaseError> {
        let sql = format!(
            r"
            SELECT {METRIC_COLUMNS}
            FROM performance_metrics pm
            LEFT JOIN exercises e ON e.id = pm.exercise_id
            WHERE pm.user_id = $1
              AND ($2 IS NULL OR pm.exercise_id = $2)
              AND ($3 IS NULL OR pm.metric_type = $3)
              AND ($4 IS NULL OR pm.recorded_at >= $4)
              AND ($5 IS NULL OR pm.recorded_at <= $5)
            ORDER BY pm.recorded_at, pm.id
            "
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(query.exercise_id.map(|e| e.to_string()))
            .bind(query.metric_type.map(|m| m.as_str()))
            .bind(query.start)
            .bind(query.end)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_metric).collect()
    }

    async fn personal_bests(&self, user_id: Uuid) -> Result<Vec<PersonalBest>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT pm.exercise_id,
                   COALESCE(e.name, $2) AS exercise,
                   pm.metric_type,
                   MAX(pm.value) AS value,
                   MAX(pm.recorded_at) AS last_recorded_at
            FROM performance_metrics pm
            LEFT JOIN exercises e ON e.id = pm.exercise_id
            WHERE pm.user_id = $1 AND pm.exercise_id IS NOT NULL
            GROUP BY pm.exercise_id, pm.metric_type
            ORDER BY exercise, pm.metric_type
            ",
        )
        .bind(user_id.to_string())
        .bind(UNKNOWN_EXERCISE_NAME)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let exercise_id: String = row.get("exercise_id");
                let metric_type: String = row.get("metric_type");
                let last_recorded_at: DateTime<Utc> = row.get("last_recorded_at");
                Ok(PersonalBest {
                    exercise_id: parse_uuid("performance_metrics", "exercise_id", &exercise_id)?,
                    exercise: row.get("exercise"),
                    metric: parse_enum("performance_metrics", "metric_type", &metric_type)?,
                    value: row.get("value"),
                    date: last_recorded_at.date_naive(),
                })
            })
            .collect()
    }
}
