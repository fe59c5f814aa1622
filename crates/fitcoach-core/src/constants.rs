// ABOUTME: Analytics defaults and service identifiers shared across crates
// ABOUTME: Window sizes, list limits, and fan-out bounds used when config is silent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Application constants organized by domain

/// Service identification
pub mod service {
    /// Service name used in logs and the health endpoint
    pub const SERVICE_NAME: &str = "fitcoach-analytics";
    /// Crate version baked in at compile time
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Training load windows and ranges
pub mod training_load {
    /// Acute (short) rolling window in days
    pub const ACUTE_WINDOW_DAYS: u32 = 7;
    /// Chronic (long) rolling window in days
    pub const CHRONIC_WINDOW_DAYS: u32 = 28;
    /// Weeks returned by the training-load endpoint when `weeks` is absent or unparsable
    pub const DEFAULT_WEEKS: u32 = 12;
    /// Upper bound on the `weeks` parameter
    pub const MAX_WEEKS: u32 = 104;
}

/// Streak computation
pub mod streak {
    /// How far back completion dates are read when computing a streak
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;
}

/// Dashboard composition
pub mod dashboard {
    /// Clients listed on the trainer dashboard
    pub const TRAINER_CLIENT_LIST_LIMIT: u32 = 10;
    /// Recent signups listed on the admin dashboard
    pub const ADMIN_RECENT_SIGNUPS_LIMIT: u32 = 5;
    /// Simultaneous per-client streak queries
    pub const FANOUT_CONCURRENCY: usize = 4;
    /// Overall budget for a dashboard request, in milliseconds
    pub const DEADLINE_MS: u64 = 5_000;
}

/// Performance metrics and body measurements
pub mod metrics {
    /// Display name used when a metric's exercise no longer resolves
    pub const UNKNOWN_EXERCISE_NAME: &str = "Unknown Exercise";
    /// Maximum accepted body fat percentage
    pub const MAX_BODY_FAT_PERCENTAGE: f64 = 50.0;
    /// Unit recorded for body weight and muscle mass metrics
    pub const MASS_UNIT: &str = "kg";
    /// Unit recorded for body fat metrics
    pub const PERCENT_UNIT: &str = "%";
    /// Longest accepted free-text unit
    pub const MAX_UNIT_LENGTH: usize = 32;
    /// Longest accepted notes field
    pub const MAX_NOTES_LENGTH: usize = 2_000;
}
