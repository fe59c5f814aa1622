// ABOUTME: Structured error types for datastore operations
// ABOUTME: Wraps sqlx failures with context and converts them into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not open or reach the database
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// What was being attempted
        context: String,
    },

    /// Schema bootstrap failed
    #[error("Database migration failed: {context}")]
    MigrationError {
        /// Which step failed
        context: String,
    },

    /// A query failed
    #[error("Query failed: {context}")]
    QueryError {
        /// Query description and driver message
        context: String,
    },

    /// A referenced row does not exist
    #[error("{entity_type} not found: {entity_id}")]
    NotFound {
        /// Kind of entity ("Exercise", "User", ...)
        entity_type: &'static str,
        /// Identifier that was looked up
        entity_id: String,
    },

    /// A stored row could not be decoded into a domain type
    #[error("Invalid stored value in {table}.{column}: {value}")]
    InvalidRecord {
        /// Table name
        table: &'static str,
        /// Column name
        column: &'static str,
        /// Offending value
        value: String,
    },

    /// Raw driver error
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity_type, .. } => Self::not_found(entity_type),
            other => Self::new(ErrorCode::DatabaseError, other.to_string()).with_source(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(error).into()
    }
}
