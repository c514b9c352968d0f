//! Configuration management for GymLog

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, GymlogError, Result};
use crate::logging::LoggingSection;
use crate::repository::MissingLogPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub screens: ScreensConfig,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// What `update_log` does with an id that is not stored
    #[serde(default)]
    pub missing_log_update: MissingLogPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_rest_seconds")]
    pub default_seconds: u32,
    /// Increment used by add/subtract while the timer runs
    #[serde(default = "default_step_seconds")]
    pub step_seconds: u32,
}

fn default_rest_seconds() -> u32 {
    60
}

fn default_step_seconds() -> u32 {
    15
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_rest_seconds(),
            step_seconds: default_step_seconds(),
        }
    }
}

/// Simulated latencies and transient-flag lifetimes, as humantime strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensConfig {
    pub home_latency: String,
    pub search_latency: String,
    pub favorites_latency: String,
    pub detail_latency: String,
    pub favorite_toggle_latency: String,
    pub profile_success_display: String,
    pub support_message_display: String,
}

impl Default for ScreensConfig {
    fn default() -> Self {
        Self {
            home_latency: "1s".to_string(),
            search_latency: "1500ms".to_string(),
            favorites_latency: "1500ms".to_string(),
            detail_latency: "1500ms".to_string(),
            favorite_toggle_latency: "1s".to_string(),
            profile_success_display: "2s".to_string(),
            support_message_display: "3s".to_string(),
        }
    }
}

/// [`ScreensConfig`] with every field parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTimings {
    pub home_latency: Duration,
    pub search_latency: Duration,
    pub favorites_latency: Duration,
    pub detail_latency: Duration,
    pub favorite_toggle_latency: Duration,
    pub profile_success_display: Duration,
    pub support_message_display: Duration,
}

impl ScreenTimings {
    /// Every delay zero, for tests that do not exercise timing
    pub fn immediate() -> Self {
        Self {
            home_latency: Duration::ZERO,
            search_latency: Duration::ZERO,
            favorites_latency: Duration::ZERO,
            detail_latency: Duration::ZERO,
            favorite_toggle_latency: Duration::ZERO,
            profile_success_display: Duration::ZERO,
            support_message_display: Duration::ZERO,
        }
    }
}

impl ScreensConfig {
    /// Parse every duration field
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` naming the first field that
    /// humantime cannot parse.
    pub fn timings(&self) -> Result<ScreenTimings> {
        Ok(ScreenTimings {
            home_latency: parse_duration("screens.home_latency", &self.home_latency)?,
            search_latency: parse_duration("screens.search_latency", &self.search_latency)?,
            favorites_latency: parse_duration(
                "screens.favorites_latency",
                &self.favorites_latency,
            )?,
            detail_latency: parse_duration("screens.detail_latency", &self.detail_latency)?,
            favorite_toggle_latency: parse_duration(
                "screens.favorite_toggle_latency",
                &self.favorite_toggle_latency,
            )?,
            profile_success_display: parse_duration(
                "screens.profile_success_display",
                &self.profile_success_display,
            )?,
            support_message_display: parse_duration(
                "screens.support_message_display",
                &self.support_message_display,
            )?,
        })
    }
}

impl Default for ScreenTimings {
    fn default() -> Self {
        Self {
            home_latency: Duration::from_millis(1000),
            search_latency: Duration::from_millis(1500),
            favorites_latency: Duration::from_millis(1500),
            detail_latency: Duration::from_millis(1500),
            favorite_toggle_latency: Duration::from_millis(1000),
            profile_success_display: Duration::from_secs(2),
            support_message_display: Duration::from_secs(3),
        }
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| {
        GymlogError::Config(ConfigError::InvalidDuration {
            field: field.to_string(),
            reason: e.to_string(),
        })
    })
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when no file exists
    ///
    /// A file that exists but is malformed is still an error.
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                path = %config_path.display(),
                "No config file found, using defaults"
            );
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            preferences: PreferencesConfig {
                path: "~/.local/share/gymlog/preferences.toml".to_string(),
            },
            repository: RepositoryConfig::default(),
            timer: TimerConfig::default(),
            screens: ScreensConfig::default(),
            logging: LoggingSection::default(),
        }
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.preferences.path.trim().is_empty() {
            return Err(ConfigError::MissingField("preferences.path".to_string()).into());
        }
        if self.timer.default_seconds == 0 {
            return Err(GymlogError::InvalidInput(
                "timer.default_seconds must be positive".to_string(),
            ));
        }
        self.screens.timings()?;
        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("GYMLOG_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("gymlog").join("config.toml"))
}

/// Expand `~` in the configured preferences path
pub fn resolve_preferences_path(config: &Config) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&config.preferences.path).to_string())
}
