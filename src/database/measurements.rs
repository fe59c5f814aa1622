// ABOUTME: Body measurement snapshots stored alongside derived performance metrics
// ABOUTME: A new snapshot and its derived metrics commit together; edits leave the metric log alone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::MeasurementStore;
use super::{parse_uuid, Database};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitcoach_core::constants::metrics::{MASS_UNIT, PERCENT_UNIT};
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{
    BodyMeasurement, MeasurementUpdate, MetricType, NewBodyMeasurement, NewPerformanceMetric,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

impl Database {
    /// Create the `user_measurements` table
    pub(super) async fn migrate_measurements(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create user_measurements",
            r"
            CREATE TABLE IF NOT EXISTS user_measurements (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recorded_at TEXT NOT NULL,
                weight REAL,
                body_fat_percentage REAL,
                muscle_mass REAL,
                measurements TEXT NOT NULL DEFAULT '{}',
                notes TEXT
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index user_measurements",
            "CREATE INDEX IF NOT EXISTS idx_user_measurements_user ON user_measurements(user_id, recorded_at)",
        )
        .await
    }

    fn row_to_measurement(row: &SqliteRow) -> Result<BodyMeasurement, DatabaseError> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let measurements: String = row.get("measurements");
        Ok(BodyMeasurement {
            id: parse_uuid("user_measurements", "id", &id)?,
            user_id: parse_uuid("user_measurements", "user_id", &user_id)?,
            recorded_at: row.get("recorded_at"),
            weight: row.get("weight"),
            body_fat_percentage: row.get("body_fat_percentage"),
            muscle_mass: row.get("muscle_mass"),
            measurements: serde_json::from_str(&measurements).map_err(|_| {
                DatabaseError::InvalidRecord {
                    table: "user_measurements",
                    column: "measurements",
                    value: measurements.clone(),
                }
            })?,
            notes: row.get("notes"),
        })
    }
}

/// Performance metrics implied by a snapshot
///
/// Only positive values become metrics; a zero body fat reading is kept on
/// the snapshot but has no metric counterpart.
fn derived_metrics(measurement: &NewBodyMeasurement) -> Vec<NewPerformanceMetric> {
    [
        (MetricType::BodyWeight, measurement.weight, MASS_UNIT),
        (MetricType::BodyFat, measurement.body_fat_percentage, PERCENT_UNIT),
        (MetricType::MuscleMass, measurement.muscle_mass, MASS_UNIT),
    ]
    .into_iter()
    .filter_map(|(metric_type, value, unit)| {
        value.filter(|v| *v > 0.0).map(|value| NewPerformanceMetric {
            exercise_id: None,
            metric_type,
            value,
            unit: unit.to_owned(),
            recorded_at: None,
            workout_session_id: None,
            notes: None,
        })
    })
    .collect()
}

#[async_trait]
impl MeasurementStore for Database {
    async fn insert_measurement(
        &self,
        user_id: Uuid,
        measurement: &NewBodyMeasurement,
        recorded_at: DateTime<Utc>,
    ) -> Result<BodyMeasurement, DatabaseError> {
        let id = Uuid::new_v4();
        let measurements = serde_json::to_string(&measurement.measurements).map_err(|e| {
            DatabaseError::QueryError {
                context: format!("Failed to serialize measurements: {e}"),
            }
        })?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO user_measurements (
                id, user_id, recorded_at, weight, body_fat_percentage, muscle_mass, measurements, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(recorded_at)
        .bind(measurement.weight)
        .bind(measurement.body_fat_percentage)
        .bind(measurement.muscle_mass)
        .bind(&measurements)
        .bind(measurement.notes.as_deref())
        .execute(&mut *tx)
        .await?;

        let derived = derived_metrics(measurement);
        for metric in &derived {
            Self::insert_metric_tx(&mut tx, user_id, metric, recorded_at).await?;
        }

        tx.commit().await?;
        debug!(user_id = %user_id, derived_metrics = derived.len(), "Stored body measurement");

        Ok(BodyMeasurement {
            id,
            user_id,
            recorded_at,
            weight: measurement.weight,
            body_fat_percentage: measurement.body_fat_percentage,
            muscle_mass: measurement.muscle_mass,
            measurements: serde_json::Value::Object(measurement.measurements.clone()),
            notes: measurement.notes.clone(),
        })
    }

    async fn list_measurements(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<BodyMeasurement>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, recorded_at, weight, body_fat_percentage, muscle_mass, measurements, notes
            FROM user_measurements
            WHERE user_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at DESC, id
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_measurement).collect()
    }

    async fn latest_measurement(
        &self,
        user_id: Uuid,
    ) -> Result<Option<BodyMeasurement>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, recorded_at, weight, body_fat_percentage, muscle_mass, measurements, notes
            FROM user_measurements
            WHERE user_id = $1
            ORDER BY recorded_at DESC, id
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_measurement).transpose()
    }

    async fn update_measurement(
        &self,
        user_id: Uuid,
        measurement_id: Uuid,
        update: &MeasurementUpdate,
    ) -> Result<Option<BodyMeasurement>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r"
            SELECT id, user_id, recorded_at, weight, body_fat_percentage, muscle_mass, measurements, notes
            FROM user_measurements
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(measurement_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut measurement = Self::row_to_measurement(&row)?;
        update.apply(&mut measurement);

        let measurements = serde_json::to_string(&measurement.measurements).map_err(|e| {
            DatabaseError::QueryError {
                context: format!("Failed to serialize measurements: {e}"),
            }
        })?;

        sqlx::query(
            r"
            UPDATE user_measurements
            SET recorded_at = $1, weight = $2, body_fat_percentage = $3, muscle_mass = $4,
                measurements = $5, notes = $6
            WHERE id = $7 AND user_id = $8
            ",
        )
        .bind(measurement.recorded_at)
        .bind(measurement.weight)
        .bind(measurement.body_fat_percentage)
        .bind(measurement.muscle_mass)
        .bind(&measurements)
        .bind(measurement.notes.as_deref())
        .bind(measurement_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id = %user_id, measurement_id = %measurement_id, "Updated body measurement");
        Ok(Some(measurement))
    }

    async fn delete_measurement(
        &self,
        user_id: Uuid,
        measurement_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM user_measurements WHERE id = $1 AND user_id = $2")
            .bind(measurement_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
