// ABOUTME: Shared server resources injected into every route and service
// ABOUTME: Holds the datastore seams, the token verifier and the loaded configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Server Resources
//!
//! Everything a request handler needs is created once at startup and shared
//! through an `Arc<ServerResources>`. The datastore is held through its
//! repository traits so tests can swap a single collaborator.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::repositories::{
    DirectoryStore, MeasurementStore, PerformanceMetricStore, ReportStore, SessionSource,
    TrainingLoadStore,
};
use crate::database::Database;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Workout sessions
    pub sessions: Arc<dyn SessionSource>,
    /// Weekly training load records
    pub training_loads: Arc<dyn TrainingLoadStore>,
    /// Performance metric log
    pub metrics: Arc<dyn PerformanceMetricStore>,
    /// Body measurement snapshots
    pub measurements: Arc<dyn MeasurementStore>,
    /// Generated progress reports
    pub reports: Arc<dyn ReportStore>,
    /// Users and trainer-client relations
    pub directory: Arc<dyn DirectoryStore>,
    /// Bearer token verification
    pub auth_manager: Arc<AuthManager>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire every store to one database
    #[must_use]
    pub fn new(database: Arc<Database>, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        Self {
            sessions: database.clone(),
            training_loads: database.clone(),
            metrics: database.clone(),
            measurements: database.clone(),
            reports: database.clone(),
            directory: database,
            auth_manager: Arc::new(auth_manager),
            config,
        }
    }

    /// Replace the session source, keeping every other collaborator
    #[must_use]
    pub fn with_session_source(mut self, sessions: Arc<dyn SessionSource>) -> Self {
        self.sessions = sessions;
        self
    }
}
