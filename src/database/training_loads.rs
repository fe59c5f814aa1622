// ABOUTME: Weekly training load persistence keyed by user and week start
// ABOUTME: Upserts make recalculating a week idempotent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::TrainingLoadStore;
use super::{parse_uuid, to_u32, Database};
use async_trait::async_trait;
use chrono::NaiveDate;
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::TrainingLoadRecord;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the `training_loads` table
    pub(super) async fn migrate_training_loads(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create training_loads",
            r"
            CREATE TABLE IF NOT EXISTS training_loads (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                week_start_date TEXT NOT NULL,
                total_volume REAL NOT NULL DEFAULT 0,
                total_sets INTEGER NOT NULL DEFAULT 0,
                total_reps INTEGER NOT NULL DEFAULT 0,
                average_intensity REAL,
                training_days INTEGER NOT NULL DEFAULT 0,
                total_duration INTEGER NOT NULL DEFAULT 0,
                acute_load REAL NOT NULL DEFAULT 0,
                chronic_load REAL NOT NULL DEFAULT 0,
                load_ratio REAL,
                risk_band TEXT,
                calculated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, week_start_date)
            )
            ",
        )
        .await
    }

    fn row_to_training_load(row: &SqliteRow) -> Result<TrainingLoadRecord, DatabaseError> {
        let user_id: String = row.get("user_id");
        Ok(TrainingLoadRecord {
            user_id: parse_uuid("training_loads", "user_id", &user_id)?,
            week_start_date: row.get("week_start_date"),
            total_volume: row.get("total_volume"),
            total_sets: to_u32("training_loads", "total_sets", row.get("total_sets"))?,
            total_reps: to_u32("training_loads", "total_reps", row.get("total_reps"))?,
            average_intensity: row.get("average_intensity"),
            training_days: to_u32("training_loads", "training_days", row.get("training_days"))?,
            total_duration: row.get("total_duration"),
            acute_load: row.get("acute_load"),
            chronic_load: row.get("chronic_load"),
            load_ratio: row.get("load_ratio"),
            risk_band: row.get("risk_band"),
            calculated_at: row.get("calculated_at"),
        })
    }
}

#[async_trait]
impl TrainingLoadStore for Database {
    async fn upsert_training_load(&self, record: &TrainingLoadRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO training_loads (
                user_id, week_start_date, total_volume, total_sets, total_reps,
                average_intensity, training_days, total_duration, acute_load,
                chronic_load, load_ratio, risk_band, calculated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id, week_start_date) DO UPDATE SET
                total_volume = excluded.total_volume,
                total_sets = excluded.total_sets,
                total_reps = excluded.total_reps,
                average_intensity = excluded.average_intensity,
                training_days = excluded.training_days,
                total_duration = excluded.total_duration,
                acute_load = excluded.acute_load,
                chronic_load = excluded.chronic_load,
                load_ratio = excluded.load_ratio,
                risk_band = excluded.risk_band,
                calculated_at = excluded.calculated_at
            ",
        )
        .bind(record.user_id.to_string())
        .bind(record.week_start_date)
        .bind(record.total_volume)
        .bind(i64::from(record.total_sets))
        .bind(i64::from(record.total_reps))
        .bind(record.average_intensity)
        .bind(i64::from(record.training_days))
        .bind(record.total_duration)
        .bind(record.acute_load)
        .bind(record.chronic_load)
        .bind(record.load_ratio)
        .bind(record.risk_band.as_deref())
        .bind(record.calculated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_training_load(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<TrainingLoadRecord>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT user_id, week_start_date, total_volume, total_sets, total_reps,
                   average_intensity, training_days, total_duration, acute_load,
                   chronic_load, load_ratio, risk_band, calculated_at
            FROM training_loads
            WHERE user_id = $1 AND week_start_date = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_training_load).transpose()
    }
}
