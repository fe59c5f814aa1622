// ABOUTME: Bearer token authentication for analytics routes
// ABOUTME: Rejects missing, malformed and expired tokens with 401 before any datastore access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::auth::AuthManager;
use crate::resources::ServerResources;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use fitcoach_core::errors::{AppError, AppResult};
use fitcoach_core::models::UserRole;
use std::sync::Arc;
use tracing::Span;
use uuid::Uuid;

/// The verified caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Caller id
    pub user_id: Uuid,
    /// Caller email
    pub email: String,
    /// Caller role
    pub role: UserRole,
}

/// Authenticate a request from its `Authorization: Bearer` header
///
/// # Errors
///
/// Returns an authentication error if the header is missing, is not a bearer
/// token, or the token fails verification
#[tracing::instrument(skip(headers, auth_manager), fields(user_id = tracing::field::Empty))]
pub fn authenticate_request(
    headers: &HeaderMap,
    auth_manager: &AuthManager,
) -> AppResult<AuthenticatedUser> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?;

    let claims = auth_manager.validate_token(token)?;
    Span::current().record("user_id", tracing::field::display(claims.sub));

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        authenticate_request(&parts.headers, &resources.auth_manager)
    }
}
