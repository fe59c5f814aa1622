// ABOUTME: Rolling acute and chronic workload with their acute:chronic ratio
// ABOUTME: Trailing windows ending at a reference date, missing days count as zero load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use chrono::{Duration, NaiveDate};
use fitcoach_core::constants::training_load::{ACUTE_WINDOW_DAYS, CHRONIC_WINDOW_DAYS};
use serde::{Deserialize, Serialize};

const DAYS_PER_WEEK: f64 = 7.0;

/// Acute and chronic load at one reference date
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingLoad {
    /// Mean weekly load over the acute window
    pub acute_load: f64,
    /// Mean weekly load over the chronic window
    pub chronic_load: f64,
    /// `acute_load / chronic_load`, absent when chronic load is zero
    pub load_ratio: Option<f64>,
}

/// Trailing-window workload analyzer
///
/// Both windows are expressed as a mean load per week so that they share a
/// scale: with the default 7/28 day windows the acute load is the load of the
/// last seven days and the chronic load is the average of the last four weeks.
/// The ratio is therefore the same as the ratio of the daily means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingLoadAnalyzer {
    acute_window_days: u32,
    chronic_window_days: u32,
}

impl Default for RollingLoadAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingLoadAnalyzer {
    /// Create an analyzer with the standard 7 and 28 day windows
    #[must_use]
    pub const fn new() -> Self {
        Self {
            acute_window_days: ACUTE_WINDOW_DAYS,
            chronic_window_days: CHRONIC_WINDOW_DAYS,
        }
    }

    /// Create an analyzer with custom windows
    ///
    /// Zero-length windows are clamped to one day.
    #[must_use]
    pub const fn with_windows(acute_days: u32, chronic_days: u32) -> Self {
        Self {
            acute_window_days: if acute_days == 0 { 1 } else { acute_days },
            chronic_window_days: if chronic_days == 0 { 1 } else { chronic_days },
        }
    }

    /// Acute window length in days
    #[must_use]
    pub const fn acute_window_days(&self) -> u32 {
        self.acute_window_days
    }

    /// Chronic window length in days
    #[must_use]
    pub const fn chronic_window_days(&self) -> u32 {
        self.chronic_window_days
    }

    /// Longest look-back any analysis needs, in days before the reference date
    #[must_use]
    pub fn lookback_days(&self) -> u32 {
        self.acute_window_days.max(self.chronic_window_days)
    }

    /// Rolling load at `reference`
    ///
    /// `series` holds dated loads in any order; several entries on the same date
    /// are summed. A window of N days covers `reference - (N - 1) ..= reference`.
    #[must_use]
    pub fn analyze(&self, series: &[(NaiveDate, f64)], reference: NaiveDate) -> RollingLoad {
        let acute_load = Self::weekly_mean(series, reference, self.acute_window_days);
        let chronic_load = Self::weekly_mean(series, reference, self.chronic_window_days);

        RollingLoad {
            acute_load,
            chronic_load,
            load_ratio: Self::load_ratio(acute_load, chronic_load),
        }
    }

    /// Acute:chronic ratio, never `NaN` or infinite
    #[must_use]
    pub fn load_ratio(acute_load: f64, chronic_load: f64) -> Option<f64> {
        if chronic_load > 0.0 && chronic_load.is_finite() && acute_load.is_finite() {
            Some(acute_load / chronic_load)
        } else {
            None
        }
    }

    fn weekly_mean(series: &[(NaiveDate, f64)], reference: NaiveDate, window_days: u32) -> f64 {
        let first_day = reference - Duration::days(i64::from(window_days) - 1);
        let total: f64 = series
            .iter()
            .filter(|(date, _)| *date >= first_day && *date <= reference)
            .map(|(_, load)| load)
            .sum();

        total / (f64::from(window_days) / DAYS_PER_WEEK)
    }
}
