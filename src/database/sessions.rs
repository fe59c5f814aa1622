// ABOUTME: Workout session storage with nested exercise and set logs
// ABOUTME: Implements SessionSource for load, streak and progress report analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::{CompletionRange, SessionSource};
use super::{parse_enum, parse_optional_uuid, parse_uuid, to_count, to_u32, Database};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{ExerciseLog, SetLog, WorkoutSession};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

impl Database {
    /// Create `workout_sessions`, `exercise_logs` and `set_logs` tables
    pub(super) async fn migrate_sessions(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create workout_sessions",
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                trainer_id TEXT REFERENCES users(id) ON DELETE SET NULL,
                status TEXT NOT NULL CHECK (status IN ('planned', 'in_progress', 'completed', 'skipped')),
                scheduled_date TEXT NOT NULL,
                actual_start_time TEXT,
                actual_end_time TEXT,
                total_volume REAL,
                completed_sets INTEGER,
                average_rpe REAL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index workout_sessions",
            "CREATE INDEX IF NOT EXISTS idx_workout_sessions_completion ON workout_sessions(user_id, status, actual_end_time)",
        )
        .await?;

        self.execute_ddl(
            "create exercise_logs",
            r"
            CREATE TABLE IF NOT EXISTS exercise_logs (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
                exercise_id TEXT REFERENCES exercises(id) ON DELETE SET NULL,
                position INTEGER NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "create set_logs",
            r"
            CREATE TABLE IF NOT EXISTS set_logs (
                id TEXT PRIMARY KEY,
                exercise_log_id TEXT NOT NULL REFERENCES exercise_logs(id) ON DELETE CASCADE,
                set_number INTEGER NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                actual_reps INTEGER,
                weight REAL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index exercise_logs",
            "CREATE INDEX IF NOT EXISTS idx_exercise_logs_session ON exercise_logs(session_id, position)",
        )
        .await
    }

    /// Store a session with its exercise and set logs in one transaction
    ///
    /// Sessions are written by the scheduling side of the platform; this is
    /// used by the demo seeder and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails, in which case nothing is stored
    pub async fn insert_session(&self, session: &WorkoutSession) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO workout_sessions (
                id, user_id, trainer_id, status, scheduled_date, actual_start_time,
                actual_end_time, total_volume, completed_sets, average_rpe
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.trainer_id.map(|id| id.to_string()))
        .bind(session.status.as_str())
        .bind(session.scheduled_date)
        .bind(session.actual_start_time)
        .bind(session.actual_end_time)
        .bind(session.total_volume)
        .bind(session.completed_sets.map(i64::from))
        .bind(session.average_rpe)
        .execute(&mut *tx)
        .await?;

        for (position, exercise) in session.exercise_logs.iter().enumerate() {
            let exercise_log_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO exercise_logs (id, session_id, exercise_id, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(exercise_log_id.to_string())
            .bind(session.id.to_string())
            .bind(exercise.exercise_id.map(|id| id.to_string()))
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .execute(&mut *tx)
            .await?;

            for set in &exercise.set_logs {
                sqlx::query(
                    r"
                    INSERT INTO set_logs (id, exercise_log_id, set_number, completed, actual_reps, weight)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(exercise_log_id.to_string())
                .bind(i64::from(set.set_number))
                .bind(set.completed)
                .bind(set.actual_reps.map(i64::from))
                .bind(set.weight)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    fn row_to_session(row: &SqliteRow) -> Result<WorkoutSession, DatabaseError> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let status: String = row.get("status");
        let completed_sets: Option<i64> = row.get("completed_sets");

        Ok(WorkoutSession {
            id: parse_uuid("workout_sessions", "id", &id)?,
            user_id: parse_uuid("workout_sessions", "user_id", &user_id)?,
            trainer_id: parse_optional_uuid("workout_sessions", "trainer_id", row.get("trainer_id"))?,
            status: parse_enum("workout_sessions", "status", &status)?,
            scheduled_date: row.get("scheduled_date"),
            actual_start_time: row.get("actual_start_time"),
            actual_end_time: row.get("actual_end_time"),
            total_volume: row.get("total_volume"),
            completed_sets: completed_sets
                .map(|sets| to_u32("workout_sessions", "completed_sets", sets))
                .transpose()?,
            average_rpe: row.get("average_rpe"),
            exercise_logs: Vec::new(),
        })
    }

    /// Exercise logs of every completed session in `range`, keyed by session id
    async fn exercise_logs_in_range(
        &self,
        user_id: Uuid,
        range: CompletionRange,
    ) -> Result<HashMap<Uuid, Vec<ExerciseLog>>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT el.session_id, el.id AS exercise_log_id, el.exercise_id,
                   sl.set_number, sl.completed, sl.actual_reps, sl.weight
            FROM exercise_logs el
            JOIN workout_sessions ws ON ws.id = el.session_id
            LEFT JOIN set_logs sl ON sl.exercise_log_id = el.id
            WHERE ws.user_id = $1
              AND ws.status = 'completed'
              AND ws.actual_end_time IS NOT NULL
              AND ($2 IS NULL OR ws.actual_end_time >= $2)
              AND ($3 IS NULL OR ws.actual_end_time <= $3)
            ORDER BY el.session_id, el.position, el.id, sl.set_number
            ",
        )
        .bind(user_id.to_string())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Self::group_exercise_logs(&rows)
    }

    /// Exercise logs of every session scheduled between `start` and `end`
    async fn exercise_logs_scheduled(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<Uuid, Vec<ExerciseLog>>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT el.session_id, el.id AS exercise_log_id, el.exercise_id,
                   sl.set_number, sl.completed, sl.actual_reps, sl.weight
            FROM exercise_logs el
            JOIN workout_sessions ws ON ws.id = el.session_id
            LEFT JOIN set_logs sl ON sl.exercise_log_id = el.id
            WHERE ws.user_id = $1
              AND ws.scheduled_date >= $2
              AND ws.scheduled_date <= $3
            ORDER BY el.session_id, el.position, el.id, sl.set_number
            ",
        )
        .bind(user_id.to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Self::group_exercise_logs(&rows)
    }

    /// Fold joined exercise/set rows, ordered by session and position
    fn group_exercise_logs(rows: &[SqliteRow]) -> Result<HashMap<Uuid, Vec<ExerciseLog>>, DatabaseError> {
        let mut logs: HashMap<Uuid, Vec<ExerciseLog>> = HashMap::new();
        let mut current_log: Option<String> = None;

        for row in rows {
            let session_id: String = row.get("session_id");
            let session_id = parse_uuid("exercise_logs", "session_id", &session_id)?;
            let exercise_log_id: String = row.get("exercise_log_id");
            let exercises = logs.entry(session_id).or_default();

            if current_log.as_deref() != Some(exercise_log_id.as_str()) || exercises.is_empty() {
                exercises.push(ExerciseLog {
                    exercise_id: parse_optional_uuid(
                        "exercise_logs",
                        "exercise_id",
                        row.get("exercise_id"),
                    )?,
                    set_logs: Vec::new(),
                });
                current_log = Some(exercise_log_id);
            }

            // LEFT JOIN yields a NULL set row for exercises without sets
            let set_number: Option<i64> = row.get("set_number");
            if let (Some(set_number), Some(exercise)) = (set_number, exercises.last_mut()) {
                let actual_reps: Option<i64> = row.get("actual_reps");
                let completed: Option<bool> = row.get("completed");
                exercise.set_logs.push(SetLog {
                    set_number: to_u32("set_logs", "set_number", set_number)?,
                    completed: completed.unwrap_or(false),
                    actual_reps: actual_reps
                        .map(|reps| to_u32("set_logs", "actual_reps", reps))
                        .transpose()?,
                    weight: row.get("weight"),
                });
            }
        }

        Ok(logs)
    }

    fn attach_exercise_logs(
        sessions: &mut [WorkoutSession],
        mut logs: HashMap<Uuid, Vec<ExerciseLog>>,
    ) {
        for session in sessions {
            if let Some(exercise_logs) = logs.remove(&session.id) {
                session.exercise_logs = exercise_logs;
            }
        }
    }
}

#[async_trait]
impl SessionSource for Database {
    async fn completed_sessions(
        &self,
        user_id: Uuid,
        range: CompletionRange,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, trainer_id, status, scheduled_date, actual_start_time,
                   actual_end_time, total_volume, completed_sets, average_rpe
            FROM workout_sessions
            WHERE user_id = $1
              AND status = 'completed'
              AND actual_end_time IS NOT NULL
              AND ($2 IS NULL OR actual_end_time >= $2)
              AND ($3 IS NULL OR actual_end_time <= $3)
            ORDER BY actual_end_time, id
            ",
        )
        .bind(user_id.to_string())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = rows
            .iter()
            .map(Self::row_to_session)
            .collect::<Result<Vec<_>, _>>()?;

        let logs = self.exercise_logs_in_range(user_id, range).await?;
        Self::attach_exercise_logs(&mut sessions, logs);
        Ok(sessions)
    }

    async fn scheduled_sessions(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutSession>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, trainer_id, status, scheduled_date, actual_start_time,
                   actual_end_time, total_volume, completed_sets, average_rpe
            FROM workout_sessions
            WHERE user_id = $1 AND scheduled_date >= $2 AND scheduled_date <= $3
            ORDER BY scheduled_date, id
            ",
        )
        .bind(user_id.to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = rows
            .iter()
            .map(Self::row_to_session)
            .collect::<Result<Vec<_>, _>>()?;

        let logs = self.exercise_logs_scheduled(user_id, start, end).await?;
        Self::attach_exercise_logs(&mut sessions, logs);
        Ok(sessions)
    }

    async fn completion_dates(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<NaiveDate>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT actual_end_time
            FROM workout_sessions
            WHERE user_id = $1
              AND status = 'completed'
              AND actual_end_time IS NOT NULL
              AND actual_end_time >= $2
            ORDER BY actual_end_time DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut dates: Vec<NaiveDate> = rows
            .iter()
            .map(|row| row.get::<DateTime<Utc>, _>("actual_end_time").date_naive())
            .collect();
        dates.dedup();
        Ok(dates)
    }

    async fn count_completed_sessions(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM workout_sessions
            WHERE user_id = $1 AND status = 'completed' AND actual_end_time IS NOT NULL
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(to_count(count))
    }
}
