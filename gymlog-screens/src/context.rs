//! Capabilities shared by every screen
//!
//! A `ScreenContext` is cloned into each state holder. It carries the
//! repository and the other capabilities as trait objects plus the parsed
//! screen delays, so tests can build one with zero latency and recording
//! fakes.

use std::sync::Arc;

use libgymlog::auth::{AuthService, InMemoryAuthProvider};
use libgymlog::notify::{Notifier, TracingNotifier};
use libgymlog::preferences::{InMemoryPreferenceStore, PreferenceStore};
use libgymlog::service::GymlogService;
use libgymlog::{InMemoryWorkoutRepository, ScreenTimings, WorkoutRepository};

#[derive(Clone)]
pub struct ScreenContext {
    pub repository: Arc<dyn WorkoutRepository>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub notifier: Arc<dyn Notifier>,
    pub auth: AuthService,
    pub timings: ScreenTimings,
    /// Rest timer add/subtract step in seconds
    pub timer_step: u32,
}

impl ScreenContext {
    pub fn from_service(service: &GymlogService) -> Self {
        Self {
            repository: service.repository(),
            preferences: service.preferences(),
            notifier: service.notifier(),
            auth: service.auth().clone(),
            timings: service.timings(),
            timer_step: service.config().timer.step_seconds,
        }
    }

    /// In-memory context over the built-in catalog
    pub fn in_memory(timings: ScreenTimings) -> Self {
        Self {
            repository: Arc::new(InMemoryWorkoutRepository::builtin()),
            preferences: Arc::new(InMemoryPreferenceStore::default()),
            notifier: Arc::new(TracingNotifier),
            auth: AuthService::new(Arc::new(InMemoryAuthProvider::new())),
            timings,
            timer_step: 15,
        }
    }

    pub fn with_repository(mut self, repository: Arc<dyn WorkoutRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_auth(mut self, auth: AuthService) -> Self {
        self.auth = auth;
        self
    }
}
