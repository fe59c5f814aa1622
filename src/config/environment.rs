// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses server, database, auth, analytics and CORS settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use fitcoach_core::constants::{dashboard, streak, training_load};
use fitcoach_intelligence::{RiskBandPolicy, RollingLoadAnalyzer};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fitcoach.db";
/// Default pool size for file-backed databases
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Default token lifetime
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Default overall HTTP request timeout
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Secret used when none is configured in development and testing
const DEVELOPMENT_JWT_SECRET: &str = "fitcoach-development-secret-do-not-deploy";

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debugging detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (default)
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; anything that is not an `sqlite:` URL is treated as a file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str.trim_start_matches("//")),
            }
        }
    }

    /// Convert to an sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size; in-memory databases always use a single connection
    pub max_connections: u32,
    /// Create missing tables on startup
    pub auto_migrate: bool,
}

/// Token verification configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Lifetime of tokens issued by tooling
    pub jwt_expiry_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Analytics tuning
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// How far back streak queries read completion dates
    pub streak_lookback_days: u32,
    /// Weeks returned by the training-load endpoint by default
    pub default_training_load_weeks: u32,
    /// Acute rolling window in days
    pub acute_window_days: u32,
    /// Chronic rolling window in days
    pub chronic_window_days: u32,
    /// Clients listed on the trainer dashboard
    pub trainer_client_list_limit: u32,
    /// Recent signups listed on the admin dashboard
    pub admin_recent_signups_limit: u32,
    /// Simultaneous per-client streak queries
    pub dashboard_fanout_concurrency: usize,
    /// Overall dashboard budget
    pub dashboard_deadline: Duration,
    /// Optional labels for load ratios; absent means ratios are not banded
    pub risk_bands: Option<RiskBandPolicy>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            streak_lookback_days: streak::DEFAULT_LOOKBACK_DAYS,
            default_training_load_weeks: training_load::DEFAULT_WEEKS,
            acute_window_days: training_load::ACUTE_WINDOW_DAYS,
            chronic_window_days: training_load::CHRONIC_WINDOW_DAYS,
            trainer_client_list_limit: dashboard::TRAINER_CLIENT_LIST_LIMIT,
            admin_recent_signups_limit: dashboard::ADMIN_RECENT_SIGNUPS_LIMIT,
            dashboard_fanout_concurrency: dashboard::FANOUT_CONCURRENCY,
            dashboard_deadline: Duration::from_millis(dashboard::DEADLINE_MS),
            risk_bands: None,
        }
    }
}

impl AnalyticsConfig {
    /// Rolling analyzer built from the configured windows
    #[must_use]
    pub const fn rolling_analyzer(&self) -> RollingLoadAnalyzer {
        RollingLoadAnalyzer::with_windows(self.acute_window_days, self.chronic_window_days)
    }
}

/// HTTP surface security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token verification
    pub auth: AuthConfig,
    /// Analytics tuning
    pub analytics: AnalyticsConfig,
    /// CORS and timeouts
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` when present)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed, or if the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let environment =
            Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            http_port: parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            environment,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                auto_migrate: parse_env("AUTO_MIGRATE", true)?,
            },
            auth: AuthConfig {
                jwt_secret: load_jwt_secret(environment)?,
                jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            },
            analytics: load_analytics()?,
            security: SecurityConfig {
                cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
                request_timeout: Duration::from_secs(parse_env(
                    "REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let analytics = &self.analytics;

        if analytics.acute_window_days == 0 || analytics.chronic_window_days == 0 {
            return Err(anyhow::anyhow!("Rolling load windows must be at least one day"));
        }
        if analytics.acute_window_days >= analytics.chronic_window_days {
            return Err(anyhow::anyhow!(
                "ACUTE_WINDOW_DAYS ({}) must be shorter than CHRONIC_WINDOW_DAYS ({})",
                analytics.acute_window_days,
                analytics.chronic_window_days
            ));
        }
        if analytics.dashboard_fanout_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "DASHBOARD_FANOUT_CONCURRENCY must be at least 1"
            ));
        }
        if analytics.dashboard_deadline.is_zero() {
            return Err(anyhow::anyhow!("DASHBOARD_DEADLINE_MS must be positive"));
        }
        if analytics.default_training_load_weeks == 0 {
            return Err(anyhow::anyhow!(
                "DEFAULT_TRAINING_LOAD_WEEKS must be at least 1"
            ));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be at least 1"));
        }
        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }
        if self.environment.is_production() && self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET {
            return Err(anyhow::anyhow!(
                "The development JWT secret cannot be used in production"
            ));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Fitcoach Analytics Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {} (max connections: {})\n\
             - Rolling Windows: {}d acute / {}d chronic\n\
             - Streak Lookback: {} days\n\
             - Dashboard Fan-out: {} concurrent, {}ms deadline\n\
             - Risk Bands: {}\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (memory)"
            } else {
                "SQLite"
            },
            self.database.max_connections,
            self.analytics.acute_window_days,
            self.analytics.chronic_window_days,
            self.analytics.streak_lookback_days,
            self.analytics.dashboard_fanout_concurrency,
            self.analytics.dashboard_deadline.as_millis(),
            self.analytics
                .risk_bands
                .as_ref()
                .map_or_else(|| "Disabled".to_owned(), ToString::to_string),
            self.security.cors_origins.join(", ")
        )
    }
}

fn load_analytics() -> Result<AnalyticsConfig> {
    let defaults = AnalyticsConfig::default();

    let risk_bands = match env::var("LOAD_RATIO_RISK_BANDS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.parse::<RiskBandPolicy>()
                .map_err(|e| anyhow::anyhow!("Invalid LOAD_RATIO_RISK_BANDS: {e}"))?,
        ),
        _ => None,
    };

    Ok(AnalyticsConfig {
        streak_lookback_days: parse_env("STREAK_LOOKBACK_DAYS", defaults.streak_lookback_days)?,
        default_training_load_weeks: parse_env(
            "DEFAULT_TRAINING_LOAD_WEEKS",
            defaults.default_training_load_weeks,
        )?,
        acute_window_days: parse_env("ACUTE_WINDOW_DAYS", defaults.acute_window_days)?,
        chronic_window_days: parse_env("CHRONIC_WINDOW_DAYS", defaults.chronic_window_days)?,
        trainer_client_list_limit: parse_env(
            "TRAINER_CLIENT_LIST_LIMIT",
            defaults.trainer_client_list_limit,
        )?,
        admin_recent_signups_limit: parse_env(
            "ADMIN_RECENT_SIGNUPS_LIMIT",
            defaults.admin_recent_signups_limit,
        )?,
        dashboard_fanout_concurrency: parse_env(
            "DASHBOARD_FANOUT_CONCURRENCY",
            defaults.dashboard_fanout_concurrency,
        )?,
        dashboard_deadline: Duration::from_millis(parse_env(
            "DASHBOARD_DEADLINE_MS",
            dashboard::DEADLINE_MS,
        )?),
        risk_bands,
    })
}

fn load_jwt_secret(environment: Environment) -> Result<String> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ if environment.is_production() => Err(anyhow::anyhow!(
            "JWT_SECRET must be set in production"
        )),
        _ => {
            warn!("JWT_SECRET not set, using the development secret");
            Ok(DEVELOPMENT_JWT_SECRET.to_owned())
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` only when it is unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            http_port: DEFAULT_HTTP_PORT,
            log_level: LogLevel::default(),
            environment: Environment::Testing,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
                max_connections: 1,
                auto_migrate: true,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_owned(),
                jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            },
            analytics: AnalyticsConfig::default(),
            security: SecurityConfig {
                cors_origins: vec!["*".to_owned()],
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("invalid"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        let file = DatabaseUrl::parse_url("sqlite:./test.db");
        assert!(!file.is_memory());
        assert_eq!(file.to_connection_string(), "sqlite:./test.db");

        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());

        let bare = DatabaseUrl::parse_url("./some/path.db");
        assert_eq!(bare.to_connection_string(), "sqlite:./some/path.db");
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.analytics.acute_window_days = 28;
        assert!(config.validate().is_err());

        config = test_config();
        config.analytics.dashboard_fanout_concurrency = 0;
        assert!(config.validate().is_err());

        config = test_config();
        config.environment = Environment::Production;
        config.auth.jwt_secret = DEVELOPMENT_JWT_SECRET.to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_omits_secret() {
        let summary = test_config().summary();
        assert!(summary.contains("7d acute / 28d chronic"));
        assert!(summary.contains("Risk Bands: Disabled"));
        assert!(!summary.contains("test-secret"));
    }
}
