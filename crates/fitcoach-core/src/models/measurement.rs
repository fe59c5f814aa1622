// ABOUTME: Body composition snapshots recorded by clients
// ABOUTME: Weight, body fat, muscle mass and free-form circumference measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use crate::errors::AppError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A stored body composition snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurement {
    /// Measurement identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// When the snapshot was taken
    pub recorded_at: DateTime<Utc>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Named circumference measurements (chest, waist, ...)
    pub measurements: serde_json::Value,
    /// Free text
    pub notes: Option<String>,
}

/// A validated snapshot ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewBodyMeasurement {
    /// Snapshot time; submission time when absent
    pub recorded_at: Option<DateTime<Utc>>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Named circumference measurements
    pub measurements: serde_json::Map<String, serde_json::Value>,
    /// Free text
    pub notes: Option<String>,
}

/// A validated partial edit of a stored snapshot
///
/// Outer `None` leaves a field untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementUpdate {
    /// New snapshot time
    pub recorded_at: Option<DateTime<Utc>>,
    /// New body weight
    pub weight: Option<Option<f64>>,
    /// New body fat percentage
    pub body_fat_percentage: Option<Option<f64>>,
    /// New muscle mass
    pub muscle_mass: Option<Option<f64>>,
    /// Replacement circumference measurements
    pub measurements: Option<serde_json::Map<String, serde_json::Value>>,
    /// New notes
    pub notes: Option<Option<String>>,
}

impl MeasurementUpdate {
    /// True when no field would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.recorded_at.is_none()
            && self.weight.is_none()
            && self.body_fat_percentage.is_none()
            && self.muscle_mass.is_none()
            && self.measurements.is_none()
            && self.notes.is_none()
    }

    /// Apply the edit to a stored snapshot
    pub fn apply(&self, measurement: &mut BodyMeasurement) {
        if let Some(recorded_at) = self.recorded_at {
            measurement.recorded_at = recorded_at;
        }
        if let Some(weight) = self.weight {
            measurement.weight = weight;
        }
        if let Some(body_fat) = self.body_fat_percentage {
            measurement.body_fat_percentage = body_fat;
        }
        if let Some(muscle_mass) = self.muscle_mass {
            measurement.muscle_mass = muscle_mass;
        }
        if let Some(measurements) = &self.measurements {
            measurement.measurements = serde_json::Value::Object(measurements.clone());
        }
        if let Some(notes) = &self.notes {
            measurement.notes.clone_from(notes);
        }
    }
}

/// Look-back window for measurement history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementTimeRange {
    /// Last 7 days
    Week,
    /// Last 30 days
    #[default]
    Month,
    /// Last 3 calendar months
    Quarter,
    /// Last 6 calendar months
    HalfYear,
    /// Last 12 calendar months
    Year,
}

impl MeasurementTimeRange {
    /// Earliest `recorded_at` included in the range ending at `now`
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Self::Week => return now - Duration::days(7),
            Self::Month => return now - Duration::days(30),
            Self::Quarter => 3,
            Self::HalfYear => 6,
            Self::Year => 12,
        };
        now.checked_sub_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl FromStr for MeasurementTimeRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "3m" => Ok(Self::Quarter),
            "6m" => Ok(Self::HalfYear),
            "1y" => Ok(Self::Year),
            other => Err(AppError::invalid_field(
                "timeRange",
                format!("Unknown time range '{other}'. Valid options: 7d, 30d, 3m, 6m, 1y"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_range_start() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        assert_eq!(
            MeasurementTimeRange::Week.start(now),
            Utc.with_ymd_and_hms(2025, 6, 8, 12, 0, 0).unwrap()
        );
        assert_eq!(
            MeasurementTimeRange::Quarter.start(now),
            Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            MeasurementTimeRange::Year.start(now),
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_update_touches_only_given_fields() {
        let recorded_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let mut measurement = BodyMeasurement {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recorded_at,
            weight: Some(82.0),
            body_fat_percentage: Some(19.0),
            muscle_mass: Some(36.0),
            measurements: serde_json::json!({ "waist": 85.0 }),
            notes: Some("morning".to_owned()),
        };
        let update = MeasurementUpdate {
            weight: Some(Some(81.4)),
            body_fat_percentage: Some(None),
            ..MeasurementUpdate::default()
        };

        assert!(!update.is_empty());
        update.apply(&mut measurement);

        assert_eq!(measurement.weight, Some(81.4));
        assert_eq!(measurement.body_fat_percentage, None);
        assert_eq!(measurement.muscle_mass, Some(36.0));
        assert_eq!(measurement.recorded_at, recorded_at);
        assert_eq!(measurement.notes.as_deref(), Some("morning"));
        assert!(MeasurementUpdate::default().is_empty());
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!(
            "6m".parse::<MeasurementTimeRange>().unwrap(),
            MeasurementTimeRange::HalfYear
        );
        assert!("2w".parse::<MeasurementTimeRange>().is_err());
    }
}
