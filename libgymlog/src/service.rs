//! Service layer for GymLog
//!
//! `GymlogService` is the composition root: it builds the repository, the
//! preference store, the notifier and the auth adapter once, and hands shared
//! references to whichever front end drives the screens.
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use libgymlog::service::GymlogService;
//!
//! # async fn example() -> libgymlog::Result<()> {
//! let service = GymlogService::new().await?;
//!
//! let mut routines = service.repository().routines();
//! if let Some(snapshot) = routines.next().await {
//!     println!("{} routines", snapshot?.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthProvider, AuthService, InMemoryAuthProvider};
use crate::config::{resolve_preferences_path, ScreenTimings};
use crate::notify::{Notifier, TracingNotifier};
use crate::preferences::{FilePreferenceStore, PreferenceStore};
use crate::repository::{InMemoryWorkoutRepository, WorkoutRepository};
use crate::timer::RestTimer;
use crate::types::UserSettings;
use crate::views::current;
use crate::{Config, Result};

/// Main service facade
///
/// All capabilities are held behind `Arc` so screens can keep their own
/// handles; cloning the service is cheap.
#[derive(Clone)]
pub struct GymlogService {
    config: Arc<Config>,
    timings: ScreenTimings,
    repository: Arc<dyn WorkoutRepository>,
    preferences: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn Notifier>,
    auth: AuthService,
}

impl GymlogService {
    /// Create a service from the configuration file, or defaults if there is none
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file exists but is invalid
    /// - The preference file exists but cannot be read
    pub async fn new() -> Result<Self> {
        let config = Config::load_or_default()?;
        Self::from_config(config).await
    }

    /// Create a service with custom configuration
    ///
    /// Uses the built-in catalog, a file-backed preference store at the
    /// configured path, a logging notifier and the in-process auth provider.
    pub async fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let repository = InMemoryWorkoutRepository::builtin()
            .with_settings(UserSettings {
                rest_timer_duration: config.timer.default_seconds,
                ..UserSettings::default()
            })
            .with_missing_log_policy(config.repository.missing_log_update);
        let preferences = FilePreferenceStore::open(resolve_preferences_path(&config)).await?;

        Self::from_parts(
            config,
            Arc::new(repository),
            Arc::new(preferences),
            Arc::new(TracingNotifier),
            Arc::new(InMemoryAuthProvider::new()),
        )
    }

    /// Assemble a service from explicit capabilities
    pub fn from_parts(
        config: Config,
        repository: Arc<dyn WorkoutRepository>,
        preferences: Arc<dyn PreferenceStore>,
        notifier: Arc<dyn Notifier>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        let timings = config.screens.timings()?;
        info!(
            missing_log_update = ?config.repository.missing_log_update,
            "GymLog service ready"
        );

        Ok(Self {
            config: Arc::new(config),
            timings,
            repository,
            preferences,
            notifier,
            auth: AuthService::new(auth_provider),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parsed `[screens]` delays
    pub fn timings(&self) -> ScreenTimings {
        self.timings
    }

    pub fn repository(&self) -> Arc<dyn WorkoutRepository> {
        Arc::clone(&self.repository)
    }

    pub fn preferences(&self) -> Arc<dyn PreferenceStore> {
        Arc::clone(&self.preferences)
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// A stopped rest timer sized from the user's current settings
    ///
    /// The adjustment step comes from `[timer] step_seconds`.
    pub async fn rest_timer(&self) -> Result<RestTimer> {
        let settings = current(self.repository.user_settings()).await?;
        RestTimer::new(
            settings.rest_timer_duration,
            self.config.timer.step_seconds,
            Arc::clone(&self.notifier),
        )
    }
}
