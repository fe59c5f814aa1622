// ABOUTME: Unified error handling for the analytics service
// ABOUTME: Re-exports the shared error types so callers import them from one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Unified Error Handling
//!
//! [`AppError`] carries an [`ErrorCode`] that maps to an HTTP status and
//! renders as `{success: false, error, code, details}`. Server-side failures
//! are logged in full but answered with a generic message.

pub use fitcoach_core::errors::database::DatabaseError;
pub use fitcoach_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, FieldError};
