// ABOUTME: User identity, role, and trainer-client connection models
// ABOUTME: Roles scope every analytics request to client, trainer, or admin views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Caller role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Trains under a trainer
    Client,
    /// Manages clients
    Trainer,
    /// Platform administrator
    Admin,
}

impl UserRole {
    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "trainer" => Ok(Self::Trainer),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::invalid_input(format!("Unknown role: '{other}'"))),
        }
    }
}

/// Platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Role
    pub role: UserRole,
    /// Whether the account is enabled
    pub is_active: bool,
    /// Signup time
    pub created_at: DateTime<Utc>,
}

/// State of a trainer-client relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Invitation not yet accepted
    Pending,
    /// Actively coached
    Active,
    /// Paused
    Inactive,
    /// Hidden from every trainer view
    Archived,
}

impl ConnectionStatus {
    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            other => Err(AppError::invalid_input(format!(
                "Unknown connection status: '{other}'"
            ))),
        }
    }
}

/// A trainer's view of one connected client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConnection {
    /// Connection identifier
    pub id: Uuid,
    /// Trainer side
    pub trainer_id: Uuid,
    /// Client side
    pub client_id: Uuid,
    /// Client email
    pub email: String,
    /// Relation state
    pub status: ConnectionStatus,
    /// When the relation was created
    pub connected_at: DateTime<Utc>,
}

/// Human-friendly name derived from an email local part
///
/// `jane.doe_fit@example.com` becomes `jane doe fit`.
#[must_use]
pub fn display_name_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or_default()
        .replace(['.', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("jane.doe_fit@example.com"), "jane doe fit");
        assert_eq!(display_name_from_email("coach@example.com"), "coach");
        assert_eq!(display_name_from_email(""), "");
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("trainer".parse::<UserRole>().unwrap(), UserRole::Trainer);
        assert!("owner".parse::<UserRole>().is_err());
    }
}
