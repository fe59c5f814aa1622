// ABOUTME: Role-based scoping of whose analytics a caller may read or write
// ABOUTME: Clients see themselves, trainers their connected clients, admins anyone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::database::repositories::DirectoryStore;
use crate::middleware::AuthenticatedUser;
use fitcoach_core::errors::{AppError, AppResult};
use fitcoach_core::models::{ConnectionStatus, UserRole};
use tracing::debug;
use uuid::Uuid;

/// Resolve the user a request is about
///
/// Without `requested` (or when it names the caller) the caller is the subject.
/// A trainer may target a client whose connection is not archived; an admin
/// may target any existing user.
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` when the caller may not access `requested`,
/// `RESOURCE_NOT_FOUND` when an admin targets an unknown user, and a database
/// error if the directory lookup fails
pub async fn resolve_subject(
    directory: &dyn DirectoryStore,
    caller: &AuthenticatedUser,
    requested: Option<Uuid>,
) -> AppResult<Uuid> {
    let Some(target) = requested.filter(|id| *id != caller.user_id) else {
        return Ok(caller.user_id);
    };

    match caller.role {
        UserRole::Admin => {
            if directory.get_user(target).await?.is_none() {
                return Err(AppError::not_found("User"));
            }
            Ok(target)
        }
        UserRole::Trainer => {
            let connection = directory.get_connection(caller.user_id, target).await?;
            match connection {
                Some(connection) if connection.status != ConnectionStatus::Archived => Ok(target),
                _ => {
                    debug!(trainer_id = %caller.user_id, client_id = %target, "Trainer has no live connection to client");
                    Err(AppError::permission_denied(
                        "You can only access analytics for your own clients",
                    ))
                }
            }
        }
        UserRole::Client => Err(AppError::permission_denied(
            "Clients can only access their own analytics",
        )),
    }
}
