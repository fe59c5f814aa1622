// ABOUTME: Operator-configured labels for acute:chronic load ratios
// ABOUTME: No cutoffs are built in; an unconfigured policy leaves ratios unlabelled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use fitcoach_core::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One labelled ratio interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBand {
    /// Label reported for ratios in this band
    pub label: String,
    /// Exclusive upper bound; `None` for the final open-ended band
    pub upper_bound: Option<f64>,
}

/// Ordered set of risk bands
///
/// Parsed from `label:upper,label:upper,...,label`. Upper bounds must be finite
/// and strictly ascending and the last band is open-ended. A ratio belongs to
/// the first band whose upper bound exceeds it.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskBandPolicy {
    bands: Vec<RiskBand>,
}

impl RiskBandPolicy {
    /// Build a policy from explicit bands
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the bands are empty, unordered, or
    /// when any band other than the last is open-ended
    pub fn new(bands: Vec<RiskBand>) -> Result<Self, AppError> {
        let Some((last, bounded)) = bands.split_last() else {
            return Err(AppError::config("Risk band policy needs at least one band"));
        };
        if last.upper_bound.is_some() {
            return Err(AppError::config(format!(
                "Last risk band '{}' must be open-ended",
                last.label
            )));
        }

        let mut previous = f64::NEG_INFINITY;
        for band in bounded {
            let Some(upper) = band.upper_bound else {
                return Err(AppError::config(format!(
                    "Risk band '{}' needs an upper bound",
                    band.label
                )));
            };
            if !upper.is_finite() || upper <= previous {
                return Err(AppError::config(format!(
                    "Risk band '{}' upper bound {upper} must be finite and above {previous}",
                    band.label
                )));
            }
            previous = upper;
        }

        if let Some(blank) = bands.iter().find(|band| band.label.trim().is_empty()) {
            return Err(AppError::config(format!(
                "Risk band labels must not be blank (found '{}')",
                blank.label
            )));
        }

        Ok(Self { bands })
    }

    /// Configured bands in ascending order
    #[must_use]
    pub fn bands(&self) -> &[RiskBand] {
        &self.bands
    }

    /// Label for `ratio`
    #[must_use]
    pub fn classify(&self, ratio: f64) -> &str {
        self.bands
            .iter()
            .find(|band| band.upper_bound.is_none_or(|upper| ratio < upper))
            .map_or("", |band| band.label.as_str())
    }
}

impl FromStr for RiskBandPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bands = s
            .split(',')
            .map(str::trim)
            .map(|entry| match entry.split_once(':') {
                Some((label, upper)) => upper
                    .trim()
                    .parse::<f64>()
                    .map(|bound| RiskBand {
                        label: label.trim().to_owned(),
                        upper_bound: Some(bound),
                    })
                    .map_err(|e| {
                        AppError::config(format!("Invalid risk band bound in '{entry}': {e}"))
                    }),
                None => Ok(RiskBand {
                    label: entry.to_owned(),
                    upper_bound: None,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(bands)
    }
}

impl fmt::Display for RiskBandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .bands
            .iter()
            .map(|band| match band.upper_bound {
                Some(upper) => format!("{}:{upper}", band.label),
                None => band.label.clone(),
            })
            .collect();
        f.write_str(&rendered.join(","))
    }
}
