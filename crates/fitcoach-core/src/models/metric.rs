// ABOUTME: Performance metric model - append-only point-in-time observations
// ABOUTME: Covers one-rep max, volume, endurance and body composition measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of performance observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Estimated one-repetition maximum
    OneRm,
    /// Training volume
    Volume,
    /// Endurance measure
    Endurance,
    /// Power output
    Power,
    /// Speed
    Speed,
    /// Body weight
    BodyWeight,
    /// Body fat percentage
    BodyFat,
    /// Muscle mass
    MuscleMass,
}

impl MetricType {
    /// Every accepted metric type, in declaration order
    pub const ALL: [Self; 8] = [
        Self::OneRm,
        Self::Volume,
        Self::Endurance,
        Self::Power,
        Self::Speed,
        Self::BodyWeight,
        Self::BodyFat,
        Self::MuscleMass,
    ];

    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneRm => "one_rm",
            Self::Volume => "volume",
            Self::Endurance => "endurance",
            Self::Power => "power",
            Self::Speed => "speed",
            Self::BodyWeight => "body_weight",
            Self::BodyFat => "body_fat",
            Self::MuscleMass => "muscle_mass",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                AppError::invalid_field(
                    "metricType",
                    format!(
                        "Unknown metric type '{s}'. Valid options: {}",
                        valid.join(", ")
                    ),
                )
            })
    }
}

/// A stored performance observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    /// Metric identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Catalog exercise the metric refers to
    pub exercise_id: Option<Uuid>,
    /// Exercise display name, joined when `exercise_id` resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    /// Kind of observation
    pub metric_type: MetricType,
    /// Observed value, always positive
    pub value: f64,
    /// Unit of `value`
    pub unit: String,
    /// When the observation was made
    pub recorded_at: DateTime<Utc>,
    /// Session that produced the observation
    pub workout_session_id: Option<Uuid>,
    /// Free text
    pub notes: Option<String>,
}

/// A validated metric ready to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerformanceMetric {
    /// Catalog exercise
    pub exercise_id: Option<Uuid>,
    /// Kind of observation
    pub metric_type: MetricType,
    /// Observed value
    pub value: f64,
    /// Unit of `value`
    pub unit: String,
    /// Observation time; submission time when absent
    pub recorded_at: Option<DateTime<Utc>>,
    /// Session that produced the observation
    pub workout_session_id: Option<Uuid>,
    /// Free text
    pub notes: Option<String>,
}

/// ANDed filters for metric queries
///
/// Both date bounds are inclusive and independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricQuery {
    /// Exact exercise match
    pub exercise_id: Option<Uuid>,
    /// Exact metric type match
    pub metric_type: Option<MetricType>,
    /// Inclusive lower bound on `recorded_at`
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `recorded_at`
    pub end: Option<DateTime<Utc>>,
}

/// Best value recorded per exercise and metric type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    /// Catalog exercise
    pub exercise_id: Uuid,
    /// Exercise display name
    pub exercise: String,
    /// Metric type
    pub metric: MetricType,
    /// Highest recorded value
    pub value: f64,
    /// Date of the most recent observation for the pair
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_type_parsing() {
        assert_eq!("one_rm".parse::<MetricType>().unwrap(), MetricType::OneRm);
        assert_eq!(
            "muscle_mass".parse::<MetricType>().unwrap(),
            MetricType::MuscleMass
        );

        let error = "unknown".parse::<MetricType>().unwrap_err();
        assert_eq!(error.http_status(), 400);
        assert_eq!(error.details[0].field, "metricType");
    }

    #[test]
    fn test_metric_type_serde_matches_storage_names() {
        for metric in MetricType::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric.as_str()));
        }
    }
}
