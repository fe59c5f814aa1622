// ABOUTME: Generated progress reports with their payload stored as JSON
// ABOUTME: Listings skip the payload so report history stays cheap to page through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::ReportStore;
use super::{parse_uuid, Database};
use async_trait::async_trait;
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{ProgressReport, ReportListing};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the `analytics_reports` table
    pub(super) async fn migrate_reports(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create analytics_reports",
            r"
            CREATE TABLE IF NOT EXISTS analytics_reports (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                report_type TEXT NOT NULL,
                period_start TEXT NOT NULL,
                period_end TEXT NOT NULL,
                report_data TEXT NOT NULL,
                generated_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index analytics_reports",
            "CREATE INDEX IF NOT EXISTS idx_analytics_reports_user ON analytics_reports(user_id, generated_at)",
        )
        .await
    }
}

#[async_trait]
impl ReportStore for Database {
    async fn insert_report(&self, report: &ProgressReport) -> Result<(), DatabaseError> {
        let data = serde_json::to_string(&report.data).map_err(|e| DatabaseError::QueryError {
            context: format!("Failed to serialize report data: {e}"),
        })?;

        sqlx::query(
            r"
            INSERT INTO analytics_reports (
                id, user_id, report_type, period_start, period_end, report_data, generated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(report.id.to_string())
        .bind(report.user_id.to_string())
        .bind(&report.report_type)
        .bind(report.period_start)
        .bind(report.period_end)
        .bind(&data)
        .bind(report.generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_reports(&self, user_id: Uuid) -> Result<Vec<ReportListing>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT id, report_type, period_start, period_end, generated_at
            FROM analytics_reports
            WHERE user_id = $1
            ORDER BY generated_at DESC, id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                Ok(ReportListing {
                    id: parse_uuid("analytics_reports", "id", &id)?,
                    report_type: row.get("report_type"),
                    period_start: row.get("period_start"),
                    period_end: row.get("period_end"),
                    generated_at: row.get("generated_at"),
                })
            })
            .collect()
    }
}
