//! Structured logging setup.
//!
//! Logs always go to stderr through a non-blocking writer; stdout is reserved
//! for plan artifacts so `apiseq plan > plan.json` stays clean.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `APISEQ_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `APISEQ_LOG_FORMAT` | `pretty` | `pretty` or `json` |
//! | `APISEQ_LOG_TARGETS` | unset | extra comma-separated filter directives |
//! | `APISEQ_LOG_LOCATION` | `false` | include file:line |
//!
//! `RUST_LOG`, when set, replaces the level filter entirely.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Module filter (comma-separated directives)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LogConfig::default();
        LogConfig {
            log_level: lookup("APISEQ_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("APISEQ_LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.format),
            target_filter: lookup("APISEQ_LOG_TARGETS").filter(|s| !s.trim().is_empty()),
            include_location: lookup("APISEQ_LOG_LOCATION")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.include_location),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the whole process.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard> {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
            }
        }
    }

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("APISEQ_LOG_LEVEL", "debug"),
            ("APISEQ_LOG_FORMAT", "json"),
            ("APISEQ_LOG_TARGETS", "apiseq::graph=trace"),
            ("APISEQ_LOG_LOCATION", "true"),
        ]
        .into();
        let config = LogConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.target_filter.as_deref(), Some("apiseq::graph=trace"));
        assert!(config.include_location);
    }

    #[test]
    fn test_config_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.level(), Level::INFO);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.target_filter.is_none());
        assert!(!config.include_location);
    }
}
