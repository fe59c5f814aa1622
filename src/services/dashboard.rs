// ABOUTME: Role-scoped dashboard summaries for clients, trainers and admins
// ABOUTME: Trainer view fans out one streak query per client under a deadline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Dashboard Aggregation
//!
//! One payload per request, discriminated by the caller's role:
//!
//! - **client**: latest measurement, completed session count, current streak
//! - **trainer**: client overview counts plus the most recently connected
//!   clients, each annotated with their own streak
//! - **admin**: platform user counts and recent signups
//!
//! The trainer view is an N+1 access pattern. Per-client streak queries run
//! concurrently, at most `dashboard_fanout_concurrency` at a time, and the
//! whole fan-out is bounded by `dashboard_deadline`. A client whose query
//! fails or does not finish in time is reported with a streak of 0. Dropping
//! the request future drops the stream and every in-flight query with it.

use crate::database::repositories::{DirectoryStore, MeasurementStore, SessionSource};
use crate::middleware::AuthenticatedUser;
use crate::resources::ServerResources;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use fitcoach_core::errors::database::DatabaseError;
use fitcoach_core::errors::AppResult;
use fitcoach_core::models::{
    display_name_from_email, ClientConnection, ConnectionStatus, User, UserRole,
};
use fitcoach_intelligence::StreakCalculator;
use futures_util::stream::{self, StreamExt as _};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Dashboard payload, tagged by `role`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardStats {
    /// The caller's own progress
    Client(ClientDashboard),
    /// The caller's client roster
    Trainer(TrainerDashboard),
    /// Platform-wide counts
    Admin(AdminDashboard),
}

/// Client view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    /// Progress figures
    pub progress_summary: ProgressSummary,
}

/// A client's progress figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Weight from the latest measurement snapshot
    pub current_weight: Option<f64>,
    /// Circumference measurements from the latest snapshot
    pub measurements: Option<serde_json::Value>,
    /// When the latest snapshot was taken
    pub last_measured_at: Option<DateTime<Utc>>,
    /// Completed sessions ever recorded
    pub total_workouts: u64,
    /// Current streak in days
    pub workout_streak: u32,
}

/// Trainer view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerDashboard {
    /// Roster counts
    pub client_overview: ClientOverview,
    /// Most recently connected clients
    pub clients: Vec<ClientSummary>,
}

/// Trainer roster counts over non-archived connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOverview {
    /// All non-archived clients
    pub total_clients: u64,
    /// Clients with an active connection
    pub active_clients: u64,
    /// Non-archived clients without an active connection
    pub inactive_clients: u64,
    /// Clients connected since the start of the month
    pub new_this_month: u64,
}

/// One client in the trainer roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// Client id
    pub id: Uuid,
    /// Display name derived from the email
    pub name: String,
    /// Client email
    pub email: String,
    /// Connection state
    pub status: ConnectionStatus,
    /// When the connection was created
    pub connected_at: DateTime<Utc>,
    /// Current streak in days, 0 when it could not be computed
    pub workout_streak: u32,
}

/// Admin view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// All users
    pub total_users: u64,
    /// Users with role trainer
    pub total_trainers: u64,
    /// Users with role client
    pub total_clients: u64,
    /// Newest users
    pub recent_signups: Vec<RecentSignup>,
}

/// A recently registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSignup {
    /// User id
    pub id: Uuid,
    /// Display name derived from the email
    pub name: String,
    /// Email
    pub email: String,
    /// Role
    pub role: UserRole,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl From<User> for RecentSignup {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: display_name_from_email(&user.email),
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Builds dashboard payloads
pub struct DashboardService {
    sessions: Arc<dyn SessionSource>,
    measurements: Arc<dyn MeasurementStore>,
    directory: Arc<dyn DirectoryStore>,
    streak_lookback_days: u32,
    client_list_limit: u32,
    recent_signups_limit: u32,
    fanout_concurrency: usize,
    deadline: StdDuration,
}

impl DashboardService {
    /// Build the service from shared resources
    #[must_use]
    pub fn new(resources: &ServerResources) -> Self {
        let analytics = &resources.config.analytics;
        Self {
            sessions: resources.sessions.clone(),
            measurements: resources.measurements.clone(),
            directory: resources.directory.clone(),
            streak_lookback_days: analytics.streak_lookback_days,
            client_list_limit: analytics.trainer_client_list_limit,
            recent_signups_limit: analytics.admin_recent_signups_limit,
            fanout_concurrency: analytics.dashboard_fanout_concurrency.max(1),
            deadline: analytics.dashboard_deadline,
        }
    }

    /// Payload for `caller`'s role
    ///
    /// # Errors
    ///
    /// Returns a database error when a query outside the per-client fan-out fails
    pub async fn stats(&self, caller: &AuthenticatedUser, now: DateTime<Utc>) -> AppResult<DashboardStats> {
        match caller.role {
            UserRole::Client => Ok(DashboardStats::Client(
                self.client_dashboard(caller.user_id, now).await?,
            )),
            UserRole::Trainer => Ok(DashboardStats::Trainer(
                self.trainer_dashboard(caller.user_id, now).await?,
            )),
            UserRole::Admin => Ok(DashboardStats::Admin(self.admin_dashboard().await?)),
        }
    }

    async fn client_dashboard(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<ClientDashboard> {
        let (latest, total_workouts, streak) = tokio::try_join!(
            self.measurements.latest_measurement(user_id),
            self.sessions.count_completed_sessions(user_id),
            current_streak(self.sessions.as_ref(), user_id, self.streak_since(now)),
        )?;

        Ok(ClientDashboard {
            progress_summary: ProgressSummary {
                current_weight: latest.as_ref().and_then(|m| m.weight),
                last_measured_at: latest.as_ref().map(|m| m.recorded_at),
                measurements: latest.map(|m| m.measurements),
                total_workouts,
                workout_streak: streak,
            },
        })
    }

    async fn trainer_dashboard(&self, trainer_id: Uuid, now: DateTime<Utc>) -> AppResult<TrainerDashboard> {
        let (counts, clients) = tokio::try_join!(
            self.directory.client_counts(trainer_id, month_start(now)),
            self.directory.list_clients(trainer_id, self.client_list_limit),
        )?;

        let streaks = self.client_streaks(&clients, now).await;
        let clients = clients
            .into_iter()
            .map(|client| ClientSummary {
                workout_streak: streaks.get(&client.client_id).copied().unwrap_or(0),
                id: client.client_id,
                name: display_name_from_email(&client.email),
                email: client.email,
                status: client.status,
                connected_at: client.connected_at,
            })
            .collect();

        Ok(TrainerDashboard {
            client_overview: ClientOverview {
                total_clients: counts.total,
                active_clients: counts.active,
                inactive_clients: counts.total.saturating_sub(counts.active),
                new_this_month: counts.new_this_month,
            },
            clients,
        })
    }

    async fn admin_dashboard(&self) -> AppResult<AdminDashboard> {
        let (counts, signups) = tokio::try_join!(
            self.directory.role_counts(),
            self.directory.recent_signups(self.recent_signups_limit),
        )?;

        Ok(AdminDashboard {
            total_users: counts.total_users,
            total_trainers: counts.trainers,
            total_clients: counts.clients,
            recent_signups: signups.into_iter().map(RecentSignup::from).collect(),
        })
    }

    /// Streaks for every client that finished before the deadline
    ///
    /// Failed and unfinished clients are absent from the map. Each query owns
    /// its inputs so the fan-out future stays `Send` inside axum handlers.
    async fn client_streaks(
        &self,
        clients: &[ClientConnection],
        now: DateTime<Utc>,
    ) -> HashMap<Uuid, u32> {
        let deadline = Instant::now() + self.deadline;
        let since = self.streak_since(now);
        let client_ids: Vec<Uuid> = clients.iter().map(|client| client.client_id).collect();
        let total = client_ids.len();
        let mut streaks = HashMap::with_capacity(total);
        let mut settled = 0_usize;

        let sessions = Arc::clone(&self.sessions);
        let mut pending = stream::iter(client_ids)
            .map(move |client_id| {
                let sessions = Arc::clone(&sessions);
                async move {
                    let streak = current_streak(sessions.as_ref(), client_id, since).await;
                    (client_id, streak)
                }
            })
            .buffer_unordered(self.fanout_concurrency);

        loop {
            match timeout_at(deadline, pending.next()).await {
                Ok(Some((client_id, Ok(streak)))) => {
                    settled += 1;
                    streaks.insert(client_id, streak);
                }
                Ok(Some((client_id, Err(error)))) => {
                    settled += 1;
                    warn!(
                        client_id = %client_id,
                        error = %error,
                        "Client streak failed, reporting 0"
                    );
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        unfinished = total - settled,
                        deadline_ms = self.deadline.as_millis(),
                        "Dashboard deadline reached, reporting 0 for unfinished clients"
                    );
                    break;
                }
            }
        }

        debug!(clients = total, computed = streaks.len(), "Client streak fan-out finished");
        streaks
    }

    fn streak_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.streak_lookback_days))
    }
}

/// Current streak length from completion dates on or after `since`
async fn current_streak(
    sessions: &dyn SessionSource,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<u32, DatabaseError> {
    let dates = sessions.completion_dates(user_id, since).await?;
    Ok(StreakCalculator::calculate(dates).length)
}

/// Midnight UTC on the first day of `now`'s month
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_start() {
        let now = Utc.with_ymd_and_hms(2024, 6, 17, 15, 30, 0).unwrap();
        assert_eq!(
            month_start(now),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_payload_is_tagged_by_role() {
        let stats = DashboardStats::Client(ClientDashboard {
            progress_summary: ProgressSummary {
                current_weight: None,
                measurements: None,
                last_measured_at: None,
                total_workouts: 0,
                workout_streak: 0,
            },
        });

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["role"], "client");
        assert_eq!(json["progressSummary"]["totalWorkouts"], 0);
        assert_eq!(json["progressSummary"]["workoutStreak"], 0);
        assert!(json["progressSummary"]["currentWeight"].is_null());
    }
}
