// ABOUTME: Body measurement snapshots: validation, storage, history and owner edits
// ABOUTME: The latest snapshot is what the client dashboard reports as current weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::params::FieldValidator;
use crate::database::repositories::MeasurementStore;
use crate::resources::ServerResources;
use chrono::{DateTime, Utc};
use fitcoach_core::constants::metrics::{MAX_BODY_FAT_PERCENTAGE, MAX_NOTES_LENGTH};
use fitcoach_core::errors::{AppError, AppResult};
use fitcoach_core::models::{
    BodyMeasurement, MeasurementTimeRange, MeasurementUpdate, NewBodyMeasurement,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Body of `POST measurements`, as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurementRequest {
    /// When the snapshot was taken; defaults to submission time
    #[serde(alias = "recordedAt")]
    pub measurement_date: Option<String>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Named circumference measurements
    #[serde(default)]
    pub measurements: Map<String, Value>,
    /// Free text
    pub notes: Option<String>,
}

/// Body of `PUT measurements/{id}`
///
/// Absent fields are left alone; an explicit `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeasurementRequest {
    /// New snapshot time
    #[serde(default, alias = "recordedAt", deserialize_with = "present")]
    pub measurement_date: Option<Option<String>>,
    /// New body weight
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    /// New body fat percentage
    #[serde(default, deserialize_with = "present")]
    pub body_fat_percentage: Option<Option<f64>>,
    /// New muscle mass
    #[serde(default, deserialize_with = "present")]
    pub muscle_mass: Option<Option<f64>>,
    /// Replacement circumference measurements
    pub measurements: Option<Map<String, Value>>,
    /// New notes
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Distinguish a field sent as `null` from one left out
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query string of `GET measurements`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementQueryParams {
    /// `7d`, `30d`, `3m`, `6m` or `1y`
    pub time_range: Option<String>,
    /// Subject user, defaults to the caller
    pub user_id: Option<String>,
}

impl MeasurementQueryParams {
    /// Parse into a time range plus the optional subject
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown range or malformed user id
    pub fn parse(&self) -> AppResult<(MeasurementTimeRange, Option<Uuid>)> {
        let mut validator = FieldValidator::new();
        let user_id = validator.uuid("userId", self.user_id.as_deref());
        let range = match self.time_range.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => validator
                .parse::<MeasurementTimeRange>("timeRange", raw)
                .unwrap_or_default(),
            _ => MeasurementTimeRange::default(),
        };
        validator.finish()?;
        Ok((range, user_id))
    }
}

/// Measurement operations
pub struct MeasurementService {
    store: Arc<dyn MeasurementStore>,
}

impl MeasurementService {
    /// Build the service from shared resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        Self {
            store: resources.measurements.clone(),
        }
    }

    /// Validate and store a snapshot for `user_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid field, or a database error
    pub async fn record(
        &self,
        user_id: Uuid,
        request: &CreateMeasurementRequest,
        now: DateTime<Utc>,
    ) -> AppResult<BodyMeasurement> {
        let measurement = validate(request)?;
        let recorded_at = measurement.recorded_at.unwrap_or(now);

        let stored = self
            .store
            .insert_measurement(user_id, &measurement, recorded_at)
            .await?;
        info!(user_id = %user_id, measurement_id = %stored.id, "Recorded body measurement");
        Ok(stored)
    }

    /// Snapshots within `range` ending at `now`, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn history(
        &self,
        user_id: Uuid,
        range: MeasurementTimeRange,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<BodyMeasurement>> {
        Ok(self.store.list_measurements(user_id, range.start(now)).await?)
    }

    /// Edit one of `user_id`'s own snapshots
    ///
    /// Derived performance metrics are not rewritten; the metric log keeps
    /// what was observed when the snapshot was first recorded.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid fields or an empty edit, and
    /// `RESOURCE_NOT_FOUND` when the snapshot is missing or someone else's
    pub async fn update(
        &self,
        user_id: Uuid,
        measurement_id: Uuid,
        request: &UpdateMeasurementRequest,
    ) -> AppResult<BodyMeasurement> {
        let update = validate_update(request)?;

        let updated = self
            .store
            .update_measurement(user_id, measurement_id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Measurement"))?;
        info!(user_id = %user_id, measurement_id = %measurement_id, "Updated body measurement");
        Ok(updated)
    }

    /// Delete one of `user_id`'s own snapshots
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the snapshot is missing or someone else's
    pub async fn delete(&self, user_id: Uuid, measurement_id: Uuid) -> AppResult<()> {
        if !self.store.delete_measurement(user_id, measurement_id).await? {
            return Err(AppError::not_found("Measurement"));
        }
        info!(user_id = %user_id, measurement_id = %measurement_id, "Deleted body measurement");
        Ok(())
    }
}

/// Parse a `measurements/{id}` path segment
///
/// # Errors
///
/// Returns a validation error on the `id` field when it is not a UUID
pub fn measurement_id(raw: &str) -> AppResult<Uuid> {
    let mut validator = FieldValidator::new();
    let id = validator.uuid("id", Some(raw));
    if raw.trim().is_empty() {
        validator.reject("id", "Invalid measurement ID");
    }
    validator.finish()?;
    id.ok_or_else(|| AppError::invalid_field("id", "Invalid measurement ID"))
}

fn check_weight(validator: &mut FieldValidator, weight: Option<f64>) {
    if let Some(weight) = weight {
        validator.check(
            weight.is_finite() && weight > 0.0,
            "weight",
            "weight must be a positive number",
        );
    }
}

fn check_body_fat(validator: &mut FieldValidator, body_fat: Option<f64>) {
    if let Some(body_fat) = body_fat {
        validator.check(
            (0.0..=MAX_BODY_FAT_PERCENTAGE).contains(&body_fat),
            "bodyFatPercentage",
            format!("bodyFatPercentage must be between 0 and {MAX_BODY_FAT_PERCENTAGE}"),
        );
    }
}

fn check_muscle_mass(validator: &mut FieldValidator, muscle_mass: Option<f64>) {
    if let Some(muscle_mass) = muscle_mass {
        validator.check(
            muscle_mass.is_finite() && muscle_mass > 0.0,
            "muscleMass",
            "muscleMass must be a positive number",
        );
    }
}

fn check_circumferences(validator: &mut FieldValidator, measurements: &Map<String, Value>) {
    for (name, value) in measurements {
        let positive = value.as_f64().is_some_and(|v| v.is_finite() && v > 0.0);
        validator.check(
            positive,
            &format!("measurements.{name}"),
            "measurements must be positive numbers",
        );
    }
}

fn check_notes(validator: &mut FieldValidator, notes: Option<&str>) {
    if let Some(notes) = notes {
        validator.check(
            notes.chars().count() <= MAX_NOTES_LENGTH,
            "notes",
            format!("notes must be at most {MAX_NOTES_LENGTH} characters"),
        );
    }
}

fn validate(request: &CreateMeasurementRequest) -> AppResult<NewBodyMeasurement> {
    let mut validator = FieldValidator::new();

    let recorded_at =
        validator.instant("measurementDate", request.measurement_date.as_deref(), false);
    check_weight(&mut validator, request.weight);
    check_body_fat(&mut validator, request.body_fat_percentage);
    check_muscle_mass(&mut validator, request.muscle_mass);
    check_circumferences(&mut validator, &request.measurements);
    check_notes(&mut validator, request.notes.as_deref());

    let empty = request.weight.is_none()
        && request.body_fat_percentage.is_none()
        && request.muscle_mass.is_none()
        && request.measurements.is_empty();
    validator.check(!empty, "measurements", "At least one measurement is required");

    validator.finish()?;

    Ok(NewBodyMeasurement {
        recorded_at,
        weight: request.weight,
        body_fat_percentage: request.body_fat_percentage,
        muscle_mass: request.muscle_mass,
        measurements: request.measurements.clone(),
        notes: request.notes.clone().filter(|notes| !notes.trim().is_empty()),
    })
}

fn validate_update(request: &UpdateMeasurementRequest) -> AppResult<MeasurementUpdate> {
    let mut validator = FieldValidator::new();

    let recorded_at = match &request.measurement_date {
        Some(raw) => {
            let parsed = validator.instant("measurementDate", raw.as_deref(), false);
            if parsed.is_none() && raw.as_deref().is_none_or(|raw| raw.trim().is_empty()) {
                validator.reject("measurementDate", "measurementDate cannot be cleared");
            }
            parsed
        }
        None => None,
    };
    check_weight(&mut validator, request.weight.flatten());
    check_body_fat(&mut validator, request.body_fat_percentage.flatten());
    check_muscle_mass(&mut validator, request.muscle_mass.flatten());
    if let Some(measurements) = &request.measurements {
        check_circumferences(&mut validator, measurements);
    }
    check_notes(&mut validator, request.notes.as_ref().and_then(Option::as_deref));

    validator.finish()?;

    let update = MeasurementUpdate {
        recorded_at,
        weight: request.weight,
        body_fat_percentage: request.body_fat_percentage,
        muscle_mass: request.muscle_mass,
        measurements: request.measurements.clone(),
        notes: request
            .notes
            .clone()
            .map(|notes| notes.filter(|notes| !notes.trim().is_empty())),
    };
    if update.is_empty() {
        return Err(AppError::invalid_input("No fields to update"));
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_out_of_range_values() {
        let request: CreateMeasurementRequest = serde_json::from_value(json!({
            "weight": -1.0,
            "bodyFatPercentage": 55.0,
            "measurements": { "waist": 0, "chest": "wide" }
        }))
        .unwrap();

        let error = validate(&request).unwrap_err();
        let fields: Vec<&str> = error.details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"weight"));
        assert!(fields.contains(&"bodyFatPercentage"));
        assert!(fields.contains(&"measurements.waist"));
        assert!(fields.contains(&"measurements.chest"));
    }

    #[test]
    fn test_requires_some_measurement() {
        let error = validate(&CreateMeasurementRequest::default()).unwrap_err();
        assert_eq!(error.details[0].field, "measurements");
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let request: UpdateMeasurementRequest = serde_json::from_value(json!({
            "weight": 80.1,
            "muscleMass": null
        }))
        .unwrap();

        let update = validate_update(&request).unwrap();
        assert_eq!(update.weight, Some(Some(80.1)));
        assert_eq!(update.muscle_mass, Some(None));
        assert_eq!(update.body_fat_percentage, None);
        assert_eq!(update.recorded_at, None);
    }

    #[test]
    fn test_update_rejects_empty_and_invalid_edits() {
        let empty = validate_update(&UpdateMeasurementRequest::default()).unwrap_err();
        assert_eq!(empty.message, "No fields to update");

        let request: UpdateMeasurementRequest = serde_json::from_value(json!({
            "measurementDate": null,
            "bodyFatPercentage": 70.0
        }))
        .unwrap();
        let error = validate_update(&request).unwrap_err();
        let fields: Vec<&str> = error.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["measurementDate", "bodyFatPercentage"]);
    }

    #[test]
    fn test_measurement_id_must_be_uuid() {
        let error = measurement_id("not-a-uuid").unwrap_err();
        assert_eq!(error.details[0].field, "id");
        assert!(measurement_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn test_accepts_snapshot() {
        let request: CreateMeasurementRequest = serde_json::from_value(json!({
            "measurementDate": "2024-06-01",
            "weight": 81.2,
            "bodyFatPercentage": 18.5,
            "measurements": { "waist": 84.0 }
        }))
        .unwrap();

        let measurement = validate(&request).unwrap();
        assert_eq!(measurement.weight, Some(81.2));
        assert_eq!(
            measurement.recorded_at.map(|at| at.to_rfc3339()),
            Some("2024-06-01T00:00:00+00:00".to_owned())
        );
    }
}
