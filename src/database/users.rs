// ABOUTME: User, trainer-client relation and exercise catalog storage
// ABOUTME: Implements DirectoryStore plus the insert helpers used by seeding and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::repositories::{ClientCounts, DirectoryStore, RoleCounts};
use super::{parse_enum, parse_uuid, to_count, Database};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::models::{ClientConnection, ConnectionStatus, User};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create users, `trainer_clients` and exercises tables
    pub(super) async fn migrate_users(&self) -> Result<(), DatabaseError> {
        self.execute_ddl(
            "create users",
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('client', 'trainer', 'admin')),
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "create trainer_clients",
            r"
            CREATE TABLE IF NOT EXISTS trainer_clients (
                id TEXT PRIMARY KEY,
                trainer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL CHECK (status IN ('pending', 'active', 'inactive', 'archived')),
                connected_at TEXT NOT NULL,
                UNIQUE(trainer_id, client_id)
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "index trainer_clients",
            "CREATE INDEX IF NOT EXISTS idx_trainer_clients_trainer ON trainer_clients(trainer_id, status)",
        )
        .await?;

        self.execute_ddl(
            "create exercises",
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )
            ",
        )
        .await
    }

    /// Insert a user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken or the insert fails
    pub async fn create_user(&self, user: &User) -> Result<Uuid, DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, email, role, is_active, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(user.id)
    }

    /// Link a client to a trainer
    ///
    /// # Errors
    ///
    /// Returns an error if the relation already exists or either user is missing
    pub async fn connect_client(
        &self,
        trainer_id: Uuid,
        client_id: Uuid,
        status: ConnectionStatus,
        connected_at: DateTime<Utc>,
    ) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO trainer_clients (id, trainer_id, client_id, status, connected_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id.to_string())
        .bind(trainer_id.to_string())
        .bind(client_id.to_string())
        .bind(status.as_str())
        .bind(connected_at)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Add an exercise to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_exercise(&self, id: Uuid, name: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO exercises (id, name) VALUES ($1, $2)")
            .bind(id.to_string())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_user(row: &SqliteRow) -> Result<User, DatabaseError> {
        let id: String = row.get("id");
        let role: String = row.get("role");
        Ok(User {
            id: parse_uuid("users", "id", &id)?,
            email: row.get("email"),
            role: parse_enum("users", "role", &role)?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
    }

    fn row_to_connection(row: &SqliteRow) -> Result<ClientConnection, DatabaseError> {
        let id: String = row.get("id");
        let trainer_id: String = row.get("trainer_id");
        let client_id: String = row.get("client_id");
        let status: String = row.get("status");
        Ok(ClientConnection {
            id: parse_uuid("trainer_clients", "id", &id)?,
            trainer_id: parse_uuid("trainer_clients", "trainer_id", &trainer_id)?,
            client_id: parse_uuid("trainer_clients", "client_id", &client_id)?,
            email: row.get("email"),
            status: parse_enum("trainer_clients", "status", &status)?,
            connected_at: row.get("connected_at"),
        })
    }
}

#[async_trait]
impl DirectoryStore for Database {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, email, role, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_connection(
        &self,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<ClientConnection>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT tc.id, tc.trainer_id, tc.client_id, u.email, tc.status, tc.connected_at
            FROM trainer_clients tc
            JOIN users u ON u.id = tc.client_id
            WHERE tc.trainer_id = $1 AND tc.client_id = $2
            ",
        )
        .bind(trainer_id.to_string())
        .bind(client_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_connection).transpose()
    }

    async fn client_counts(
        &self,
        trainer_id: Uuid,
        month_start: DateTime<Utc>,
    ) -> Result<ClientCounts, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active,
                COALESCE(SUM(CASE WHEN connected_at >= $2 THEN 1 ELSE 0 END), 0) AS new_this_month
            FROM trainer_clients
            WHERE trainer_id = $1 AND status != 'archived'
            ",
        )
        .bind(trainer_id.to_string())
        .bind(month_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(ClientCounts {
            total: to_count(row.get("total")),
            active: to_count(row.get("active")),
            new_this_month: to_count(row.get("new_this_month")),
        })
    }

    async fn list_clients(
        &self,
        trainer_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ClientConnection>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT tc.id, tc.trainer_id, tc.client_id, u.email, tc.status, tc.connected_at
            FROM trainer_clients tc
            JOIN users u ON u.id = tc.client_id
            WHERE tc.trainer_id = $1 AND tc.status != 'archived'
            ORDER BY tc.connected_at DESC, tc.id
            LIMIT $2
            ",
        )
        .bind(trainer_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_connection).collect()
    }

    async fn role_counts(&self) -> Result<RoleCounts, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_users,
                COALESCE(SUM(CASE WHEN role = 'trainer' THEN 1 ELSE 0 END), 0) AS trainers,
                COALESCE(SUM(CASE WHEN role = 'client' THEN 1 ELSE 0 END), 0) AS clients
            FROM users
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RoleCounts {
            total_users: to_count(row.get("total_users")),
            trainers: to_count(row.get("trainers")),
            clients: to_count(row.get("clients")),
        })
    }

    async fn recent_signups(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT id, email, role, is_active, created_at
            FROM users
            ORDER BY created_at DESC, id
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }
}
