//! Subscriber setup for GymLog front-ends
//!
//! The `[logging]` table of the config file picks a format and a level;
//! `GYMLOG_LOG_FORMAT` and `GYMLOG_LOG_LEVEL` override it, and `RUST_LOG`
//! overrides both. The level applies to the GymLog crates only, everything
//! else stays at `warn`.
//!
//! ```no_run
//! use libgymlog::logging::LoggingConfig;
//! use libgymlog::Config;
//!
//! let config = Config::load_or_default()?;
//! LoggingConfig::resolve(&config).init();
//! # Ok::<(), libgymlog::GymlogError>(())
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::Config;

pub const LOG_FORMAT_ENV: &str = "GYMLOG_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "GYMLOG_LOG_LEVEL";

/// Crates whose events follow the configured level
const GYMLOG_TARGETS: [&str; 2] = ["libgymlog", "gymlog_screens"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain single-line output
    #[default]
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line, for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Unknown log format '{}' (expected text, json or pretty)",
                other
            )),
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

/// Resolved subscriber settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl LoggingConfig {
    /// File settings with the environment layered on top
    ///
    /// An unparseable `GYMLOG_LOG_FORMAT` is ignored rather than fatal.
    pub fn resolve(config: &Config) -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(config.logging.format);
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| config.logging.level.clone());

        Self { format, level }
    }

    /// Filter directives used when `RUST_LOG` is absent
    pub fn directives(&self) -> String {
        let level = self.level.trim();
        GYMLOG_TARGETS
            .iter()
            .fold("warn".to_string(), |acc, target| {
                format!("{},{}={}", acc, target, level)
            })
    }

    /// Install the global subscriber on stderr
    ///
    /// Returns `false` if a subscriber is already installed.
    pub fn init(&self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directives()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        let installed = match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .try_init(),
            LogFormat::Pretty => builder.pretty().with_line_number(true).try_init(),
            LogFormat::Text => builder.with_target(false).try_init(),
        };
        installed.is_ok()
    }
}
