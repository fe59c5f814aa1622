// ABOUTME: Core types and constants for the fitcoach training analytics service
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![deny(unsafe_code)]

//! # Fitcoach Core
//!
//! Foundation crate providing shared types and constants for the fitcoach
//! analytics service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and field-level validation errors
//! - **models**: Workout sessions, training load records, performance metrics, users, measurements
//! - **constants**: Analytics defaults shared by the service and the algorithms

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Core data models (sessions, training load, metrics, users, measurements)
pub mod models;

/// Application constants and analytics defaults
pub mod constants;
