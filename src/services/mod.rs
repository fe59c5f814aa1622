// ABOUTME: Domain service layer behind the analytics and dashboard routes
// ABOUTME: Services validate input, scope access and drive the pure analytics crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Domain service layer
//!
//! Route handlers only parse HTTP and wrap responses; every business rule lives
//! here so it can be exercised directly in tests without a router.

/// Whose analytics a caller may read
pub mod access;

/// Role-scoped dashboard summaries
pub mod dashboard;

/// Body measurement snapshots
pub mod measurements;

/// Performance metric logging and queries
pub mod performance_metrics;

/// Progress report generation
pub mod reports;

/// Weekly training load history and recalculation
pub mod training_load;

/// Shared request parameter parsing
pub mod params;

pub use access::resolve_subject;
pub use dashboard::{DashboardService, DashboardStats};
pub use measurements::MeasurementService;
pub use performance_metrics::PerformanceMetricsService;
pub use reports::ReportService;
pub use training_load::TrainingLoadService;
