// ABOUTME: Weekly training load history and single-week recalculation
// ABOUTME: Loads completed sessions plus the chronic look-back and runs the aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use super::params::FieldValidator;
use crate::database::repositories::{CompletionRange, SessionSource, TrainingLoadStore};
use crate::resources::ServerResources;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fitcoach_core::constants::training_load::MAX_WEEKS;
use fitcoach_core::errors::AppResult;
use fitcoach_core::models::TrainingLoadRecord;
use fitcoach_intelligence::{week_start, LoadAggregator, RiskBandPolicy};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Query string of `GET training-load`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLoadQueryParams {
    /// Number of weeks back from today
    pub weeks: Option<String>,
    /// Fixed start date, overrides `weeks`
    pub start_date: Option<String>,
    /// Subject user, defaults to the caller
    pub user_id: Option<String>,
}

impl TrainingLoadQueryParams {
    /// Parse into a history window plus the optional subject
    ///
    /// # Errors
    ///
    /// Returns one validation error listing every malformed parameter
    pub fn parse(&self, default_weeks: u32) -> AppResult<(HistoryWindow, Option<Uuid>)> {
        let mut validator = FieldValidator::new();
        let user_id = validator.uuid("userId", self.user_id.as_deref());
        let window = HistoryWindow::from_query(
            &mut validator,
            self.weeks.as_deref(),
            self.start_date.as_deref(),
            default_weeks,
        );
        validator.finish()?;
        Ok((window, user_id))
    }
}

/// Where a training load history starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    /// The last N weeks up to today
    Weeks(u32),
    /// Everything since a date
    Since(NaiveDate),
}

impl HistoryWindow {
    /// Interpret `weeks` / `startDate` query values
    ///
    /// `startDate` wins when present. `weeks` falls back to `default_weeks`
    /// when absent, unparsable or zero, and is capped. A malformed
    /// `startDate` is recorded on `validator`.
    pub fn from_query(
        validator: &mut FieldValidator,
        weeks: Option<&str>,
        start_date: Option<&str>,
        default_weeks: u32,
    ) -> Self {
        if let Some(date) = validator.date("startDate", start_date) {
            return Self::Since(date);
        }

        let weeks = weeks
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|weeks| *weeks > 0)
            .unwrap_or(default_weeks)
            .min(MAX_WEEKS);
        Self::Weeks(weeks)
    }

    /// First day covered when the window ends on `today`
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Weeks(weeks) => today - Duration::weeks(i64::from(weeks)),
            Self::Since(date) => date,
        }
    }
}

/// Training load operations for one request
pub struct TrainingLoadService {
    sessions: Arc<dyn SessionSource>,
    store: Arc<dyn TrainingLoadStore>,
    aggregator: LoadAggregator,
    risk_bands: Option<RiskBandPolicy>,
}

impl TrainingLoadService {
    /// Build the service from shared resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        let analytics = &resources.config.analytics;
        Self {
            sessions: resources.sessions.clone(),
            store: resources.training_loads.clone(),
            aggregator: LoadAggregator::with_analyzer(analytics.rolling_analyzer()),
            risk_bands: analytics.risk_bands.clone(),
        }
    }

    /// Weekly records for every week since `start` that has a completed session
    ///
    /// Records are computed from sessions, oldest week first. Sessions from
    /// before the first week are loaded so its chronic load is complete.
    ///
    /// # Errors
    ///
    /// Returns a database error if sessions cannot be loaded
    pub async fn history(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<TrainingLoadRecord>> {
        let first_week = week_start(start);
        let range = CompletionRange {
            start: Some(start_of_day(self.aggregator.history_start(first_week))),
            end: Some(now),
        };

        let sessions = self.sessions.completed_sessions(user_id, range).await?;
        let records: Vec<TrainingLoadRecord> = self
            .aggregator
            .aggregate(user_id, &sessions, now)
            .into_iter()
            .filter(|record| record.week_start_date >= first_week)
            .map(|record| self.apply_risk_band(record))
            .collect();

        debug!(
            user_id = %user_id,
            sessions = sessions.len(),
            weeks = records.len(),
            "Computed training load history"
        );
        Ok(records)
    }

    /// Recompute the week containing `week_date` and store it
    ///
    /// Running this twice over the same sessions stores the same record.
    ///
    /// # Errors
    ///
    /// Returns a database error if sessions cannot be loaded or the upsert fails
    pub async fn recalculate_week(
        &self,
        user_id: Uuid,
        week_date: NaiveDate,
        calculated_at: DateTime<Utc>,
    ) -> AppResult<TrainingLoadRecord> {
        let week = week_start(week_date);
        let range = CompletionRange {
            start: Some(start_of_day(self.aggregator.history_start(week))),
            end: Some(start_of_day(week + Duration::days(7)) - Duration::nanoseconds(1)),
        };

        let sessions = self.sessions.completed_sessions(user_id, range).await?;
        let record = self.apply_risk_band(self.aggregator.aggregate_week(
            user_id,
            week,
            &sessions,
            calculated_at,
        ));

        self.store.upsert_training_load(&record).await?;
        info!(
            user_id = %user_id,
            week_start = %week,
            total_volume = record.total_volume,
            "Stored weekly training load"
        );
        Ok(record)
    }

    fn apply_risk_band(&self, mut record: TrainingLoadRecord) -> TrainingLoadRecord {
        record.risk_band = match (&self.risk_bands, record.load_ratio) {
            (Some(policy), Some(ratio)) => Some(policy.classify(ratio).to_owned()),
            _ => None,
        };
        record
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
