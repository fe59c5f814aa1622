// ABOUTME: Structured logging setup for the analytics server and its tooling
// ABOUTME: Derives level and output format from the loaded server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! Logging configuration
//!
//! Production emits one JSON object per event; development prints
//! human-readable lines. `RUST_LOG`, when set, replaces the computed filter
//! entirely. `LOG_FORMAT` (`json`, `pretty`, `compact`) overrides the format.

use crate::config::{Environment, LogLevel, ServerConfig};
use anyhow::Result;
use fitcoach_core::constants::service::{SERVICE_NAME, SERVICE_VERSION};
use std::env;
use std::io;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Dependency targets held down whatever the application level is
const DEPENDENCY_DIRECTIVES: [&str; 4] = ["hyper=warn", "sqlx=warn", "h2=warn", "tower_http=info"];

/// Crates whose events follow the configured level
const APPLICATION_TARGETS: [&str; 3] = [
    "fitcoach_analytics",
    "fitcoach_intelligence",
    "fitcoach_core",
];

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-field human-readable lines
    Pretty,
    /// Single short line per event
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format '{other}'")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level applied to the application crates
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Deployment environment, reported at startup
    pub environment: Environment,
    /// Include source file, line and span close timings
    pub verbose_events: bool,
}

impl LoggingConfig {
    /// Logging settings for a loaded server configuration
    #[must_use]
    pub fn for_server(config: &ServerConfig) -> Self {
        let production = config.environment.is_production();
        let format = env::var("LOG_FORMAT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(if production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            });

        Self {
            level: config.log_level,
            format,
            environment: config.environment,
            verbose_events: production,
        }
    }

    /// `RUST_LOG` when set, otherwise the configured level for our crates
    /// plus dependency caps
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
        EnvFilter::new(self.directives())
    }

    fn directives(&self) -> String {
        let mut directives = vec!["warn".to_owned()];
        directives.extend(
            APPLICATION_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.level)),
        );
        directives.extend(DEPENDENCY_DIRECTIVES.iter().map(|d| (*d).to_owned()));
        directives.join(",")
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.verbose_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_file(self.verbose_events)
                        .with_line_number(self.verbose_events)
                        .with_span_events(span_events)
                        .with_writer(io::stdout),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(self.verbose_events)
                        .with_line_number(self.verbose_events)
                        .with_span_events(span_events)
                        .with_writer(io::stdout),
                )
                .try_init()?,
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
                .try_init()?,
        }

        info!(
            service.name = SERVICE_NAME,
            service.version = SERVICE_VERSION,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging for `config`
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init(config: &ServerConfig) -> Result<()> {
    LoggingConfig::for_server(config).init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" compact ".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_directives_cover_application_crates() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Compact,
            environment: Environment::Testing,
            verbose_events: false,
        };

        let directives = config.directives();
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("fitcoach_analytics=debug"));
        assert!(directives.contains("fitcoach_intelligence=debug"));
        assert!(directives.contains("sqlx=warn"));
    }
}
