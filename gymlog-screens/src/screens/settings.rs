//! Settings screen
//!
//! Mirrors the preference store and the stored rest timer length. Setters
//! write through and the new value arrives back via the observed channels.

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::preferences::{AppTheme, UserPreferences};
use tokio::sync::watch;
use tracing::info;

use crate::context::ScreenContext;
use crate::error::Result;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUiState {
    pub preferences: UserPreferences,
    /// Seconds; `None` until the settings have loaded
    pub rest_timer_duration: Option<u32>,
    pub error_message: Option<String>,
}

pub struct SettingsScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<SettingsUiState>>,
    _tasks: TaskSet,
}

impl SettingsScreen {
    pub fn new(context: ScreenContext) -> Self {
        let mut preferences = context.preferences.observe();
        let state = Arc::new(watch::Sender::new(SettingsUiState {
            preferences: *preferences.borrow_and_update(),
            rest_timer_duration: None,
            error_message: None,
        }));
        let tasks = TaskSet::new();

        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while preferences.changed().await.is_ok() {
                let next = *preferences.borrow_and_update();
                publisher.send_if_modified(|s| {
                    let changed = s.preferences != next;
                    s.preferences = next;
                    changed
                });
            }
        });

        let mut settings = context.repository.user_settings();
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = settings.next().await {
                match item {
                    Ok(settings) => publisher.send_modify(|s| {
                        s.rest_timer_duration = Some(settings.rest_timer_duration);
                    }),
                    Err(e) => {
                        publisher.send_modify(|s| {
                            s.error_message = Some(failure("load settings", e));
                        });
                        return;
                    }
                }
            }
        });

        Self {
            context,
            state,
            _tasks: tasks,
        }
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        let outcome = self.context.preferences.update_dark_mode(enabled).await;
        self.settle("update dark mode", outcome)
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        let outcome = self.context.preferences.update_notifications(enabled).await;
        self.settle("update notifications", outcome)
    }

    pub async fn set_app_theme(&self, theme: AppTheme) -> Result<()> {
        let outcome = self.context.preferences.update_theme(theme).await;
        self.settle("update theme", outcome)
    }

    pub async fn set_rest_timer_duration(&self, seconds: u32) -> Result<()> {
        let outcome = self
            .context
            .repository
            .update_rest_timer_duration(seconds)
            .await;
        self.settle("update rest timer", outcome)
    }

    /// Remove every routine from the favorite set
    pub async fn clear_favorites(&self) -> Result<()> {
        let outcome = self.context.repository.clear_favorites().await;
        if outcome.is_ok() {
            info!("Favorites cleared");
        }
        self.settle("clear favorites", outcome)
    }

    fn settle(&self, action: &str, outcome: libgymlog::Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.state.send_if_modified(|s| s.error_message.take().is_some());
                Ok(())
            }
            Err(e) => {
                self.state
                    .send_modify(|s| s.error_message = Some(failure(action, &e)));
                Err(e.into())
            }
        }
    }
}

impl Screen for SettingsScreen {
    type State = SettingsUiState;

    fn subscribe(&self) -> watch::Receiver<SettingsUiState> {
        self.state.subscribe()
    }
}
