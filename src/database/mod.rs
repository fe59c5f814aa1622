// ABOUTME: SQLite datastore for sessions, training loads, metrics, measurements, reports and users
// ABOUTME: Owns the connection pool with an explicit open, migrate, close lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Database Management
//!
//! [`Database`] wraps an `sqlx` `SQLite` pool. It is created once at startup,
//! shared behind an `Arc`, and closed on shutdown; nothing in the crate reaches
//! it through global state. Every query binds its parameters.
//!
//! Identifiers are stored as `TEXT` UUIDs, calendar dates as `YYYY-MM-DD` and
//! timestamps as RFC 3339 `TEXT`, which keeps range comparisons lexicographic.

mod measurements;
mod metrics;
mod reports;
mod sessions;
mod training_loads;
mod users;

/// Repository traits implemented by [`Database`]
pub mod repositories;

use crate::config::{DatabaseConfig, DatabaseUrl};
use fitcoach_core::errors::database::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// Analytics datastore
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a database from configuration, running migrations when enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let database = Self::new(&config.url, config.max_connections).await?;
        if config.auto_migrate {
            database.migrate().await?;
        }
        Ok(database)
    }

    /// Open a connection pool
    ///
    /// In-memory databases are pinned to a single connection that never expires,
    /// otherwise every pooled connection would see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the database
    /// file cannot be created
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("Invalid database URL {url}: {e}"),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DatabaseError::ConnectionError {
                        context: format!("Directory creation error for {}: {e}", parent.display()),
                    }
                })?;
            }
        }

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("Failed to open {url}: {e}"),
            })?;

        info!(database = %url, "Database connection established");
        Ok(Self { pool })
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and index that does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any bootstrap statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.migrate_users().await?;
        self.migrate_sessions().await?;
        self.migrate_training_loads().await?;
        self.migrate_metrics().await?;
        self.migrate_measurements().await?;
        self.migrate_reports().await?;
        debug!("Database schema is up to date");
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }

    /// Run one DDL statement, labelling failures with `step`
    async fn execute_ddl(&self, step: &str, sql: &str) -> Result<(), DatabaseError> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError {
                context: format!("{step}: {e}"),
            })?;
        Ok(())
    }
}

/// Parse a stored UUID column
fn parse_uuid(table: &'static str, column: &'static str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidRecord {
        table,
        column,
        value: value.to_owned(),
    })
}

/// Parse an optional stored UUID column
fn parse_optional_uuid(
    table: &'static str,
    column: &'static str,
    value: Option<String>,
) -> Result<Option<Uuid>, DatabaseError> {
    value.map(|v| parse_uuid(table, column, &v)).transpose()
}

/// Parse a stored enum column through its `FromStr`
fn parse_enum<T: FromStr>(
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<T, DatabaseError> {
    value.parse().map_err(|_| DatabaseError::InvalidRecord {
        table,
        column,
        value: value.to_owned(),
    })
}

/// Convert a non-negative SQL count or integer column
fn to_u32(table: &'static str, column: &'static str, value: i64) -> Result<u32, DatabaseError> {
    u32::try_from(value).map_err(|_| DatabaseError::InvalidRecord {
        table,
        column,
        value: value.to_string(),
    })
}

/// Convert a SQL `COUNT(*)`
fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
