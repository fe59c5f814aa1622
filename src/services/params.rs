// ABOUTME: Field-level parsing of request parameters with error collection
// ABOUTME: Every malformed field is reported together in one 400 response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fitcoach_core::errors::{AppError, AppResult, FieldError};
use std::str::FromStr;
use uuid::Uuid;

/// Collects field problems while parsing a request
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    /// Empty validator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with `field`
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record a problem when `ok` is false
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.reject(field, message);
        }
    }

    /// Parse an optional identifier
    pub fn uuid(&mut self, field: &str, raw: Option<&str>) -> Option<Uuid> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
        match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.reject(field, format!("'{raw}' is not a valid identifier"));
                None
            }
        }
    }

    /// Parse an optional calendar date (`YYYY-MM-DD` or an RFC 3339 timestamp)
    pub fn date(&mut self, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));
        if parsed.is_none() {
            self.reject(field, format!("'{raw}' is not a valid date"));
        }
        parsed
    }

    /// Parse an optional instant
    ///
    /// A bare date resolves to the start of that day (UTC), or to its last
    /// representable instant when `end_of_day` is set, so date bounds stay
    /// inclusive.
    pub fn instant(&mut self, field: &str, raw: Option<&str>, end_of_day: bool) -> Option<DateTime<Utc>> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => {
                let time = if end_of_day {
                    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
                } else {
                    NaiveTime::MIN
                };
                Some(date.and_time(time).and_utc())
            }
            Err(_) => {
                self.reject(field, format!("'{raw}' is not a valid date or timestamp"));
                None
            }
        }
    }

    /// Parse a value through its `FromStr`, keeping the parser's field messages
    pub fn parse<T>(&mut self, field: &str, raw: &str) -> Option<T>
    where
        T: FromStr<Err = AppError>,
    {
        match raw.parse() {
            Ok(value) => Some(value),
            Err(error) => {
                if error.details.is_empty() {
                    self.reject(field, error.message);
                } else {
                    self.errors.extend(error.details);
                }
                None
            }
        }
    }

    /// `Ok` when no problem was recorded, otherwise one validation error
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` listing every recorded field problem
    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitcoach_core::models::MetricType;

    #[test]
    fn test_collects_every_problem() {
        let mut validator = FieldValidator::new();
        assert!(validator.uuid("exerciseId", Some("nope")).is_none());
        assert!(validator.parse::<MetricType>("metricType", "unknown").is_none());
        validator.check(false, "value", "must be positive");

        let error = validator.finish().unwrap_err();
        assert_eq!(error.http_status(), 400);
        let fields: Vec<&str> = error.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["exerciseId", "metricType", "value"]);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let mut validator = FieldValidator::new();
        assert!(validator.uuid("userId", Some("  ")).is_none());
        assert!(validator.date("startDate", None).is_none());
        assert!(validator.finish().is_ok());
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let mut validator = FieldValidator::new();
        let start = validator.instant("startDate", Some("2024-06-01"), false).unwrap();
        let end = validator.instant("endDate", Some("2024-06-01"), true).unwrap();

        assert_eq!(start.to_rfc3339(), "2024-06-01T00:00:00+00:00");
        assert!(end > start);
        assert_eq!(end.date_naive(), start.date_naive());
        assert_eq!(
            validator.date("startDate", Some("2024-06-03T10:00:00Z")),
            NaiveDate::from_ymd_opt(2024, 6, 3)
        );
    }
}
