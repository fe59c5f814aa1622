// ABOUTME: HTTP middleware for authentication, cross-origin access and request time budgets
// ABOUTME: Request ids and tracing spans come from tower-http layers in the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

/// Bearer token authentication
pub mod auth;
/// CORS configuration
pub mod cors;
/// Request time budget
pub mod timeout;

pub use auth::{authenticate_request, AuthenticatedUser};
pub use cors::setup_cors;
pub use timeout::request_timeout;
