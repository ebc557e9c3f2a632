// Tracing log adapter - Structured logging using tracing crate

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::toml_config::LoggingSettings;
use crate::domain::errors::*;
use crate::domain::model::{LogEvent, ProgressEvent};

/// Target used for lines forwarded from the engine
pub const ENGINE_LOG_TARGET: &str = "editx::engine";

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Directive understood by `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Tracing log adapter
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Install the global subscriber; `RUST_LOG` wins over the configured level.
    ///
    /// Returns false when a subscriber was already installed.
    pub fn init(settings: &LoggingSettings) -> bool {
        let level = LogLevel::parse(&settings.level).unwrap_or(LogLevel::Info);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

        let installed = if settings.json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok()
        };

        if installed {
            debug!("Logging initialized at level {:?}", level);
        }
        installed
    }

    /// Forward one engine line
    pub fn engine_line(event: &LogEvent) {
        debug!(target: ENGINE_LOG_TARGET, "{}", event.message);
    }

    /// Report engine progress
    pub fn progress(event: &ProgressEvent) {
        info!(
            progress = event.percent(),
            time = event.time_seconds,
            "Processing: {}%",
            event.percent()
        );
    }
}
