// ABOUTME: Training consistency and workload analytics engine
// ABOUTME: Streaks, weekly load, rolling acute:chronic load, risk bands and progress summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

#![deny(unsafe_code)]

//! # Fitcoach Intelligence
//!
//! Pure, synchronous analytics over completed workout sessions. Nothing in this
//! crate touches the datastore; callers load sessions and hand them in.
//!
//! - [`StreakCalculator`]: most recent unbroken run of training days
//! - [`LoadAggregator`]: weekly [`TrainingLoadRecord`](fitcoach_core::models::TrainingLoadRecord) summaries
//! - [`RollingLoadAnalyzer`]: acute and chronic rolling load and their ratio
//! - [`RiskBandPolicy`]: externally configured labels for load ratios
//! - [`ProgressSummarizer`]: headline figures for progress reports

/// Consecutive-day training streaks
pub mod streak;

/// Weekly training load aggregation
pub mod load_aggregator;

/// Rolling acute/chronic workload
pub mod rolling_load;

/// Configurable load-ratio risk bands
pub mod risk_bands;

/// Progress report summaries
pub mod progress;

pub use load_aggregator::{week_start, LoadAggregator, SessionLoad};
pub use progress::ProgressSummarizer;
pub use risk_bands::{RiskBand, RiskBandPolicy};
pub use rolling_load::{RollingLoad, RollingLoadAnalyzer};
pub use streak::{StreakCalculator, StreakResult};
