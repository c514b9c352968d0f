//! Profile screen

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::ProfileData;
use tokio::sync::watch;
use tracing::info;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet, TaskSlot};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUiState {
    pub profile_data: Option<ProfileData>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Shown briefly after a successful save
    pub update_success: bool,
}

impl Default for ProfileUiState {
    fn default() -> Self {
        Self {
            profile_data: None,
            is_loading: true,
            error_message: None,
            update_success: false,
        }
    }
}

pub struct ProfileScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<ProfileUiState>>,
    tasks: TaskSet,
    success_reset: Arc<TaskSlot>,
}

impl ProfileScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(ProfileUiState::default()));
        let tasks = TaskSet::new();

        let mut profile = context.repository.user_profile();
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = profile.next().await {
                match item {
                    Ok(data) => publisher.send_modify(|s| {
                        s.profile_data = Some(data);
                        s.is_loading = false;
                    }),
                    Err(e) => {
                        publisher.send_modify(|s| {
                            s.is_loading = false;
                            s.error_message = Some(failure("load profile", e));
                        });
                        return;
                    }
                }
            }
        });

        Self {
            context,
            state,
            tasks,
            success_reset: Arc::new(TaskSlot::new()),
        }
    }

    /// Save new profile values; ignored until the profile has loaded
    ///
    /// Each successful save shows `update_success` for the full display time.
    pub fn update_profile(&self, name: impl Into<String>, height: f64, weight: f64) {
        let Some(id) = self.state.borrow().profile_data.as_ref().map(|p| p.id) else {
            return;
        };
        let profile = ProfileData {
            id,
            name: name.into(),
            height,
            weight,
        };

        let repository = Arc::clone(&self.context.repository);
        let publisher = Arc::clone(&self.state);
        let success_reset = Arc::clone(&self.success_reset);
        let display = self.context.timings.profile_success_display;
        self.tasks.spawn(async move {
            match repository.update_profile(profile).await {
                Ok(()) => {
                    info!("Profile updated");
                    publisher.send_modify(|s| {
                        s.update_success = true;
                        s.error_message = None;
                    });
                    success_reset.replace(async move {
                        tokio::time::sleep(display).await;
                        publisher.send_modify(|s| s.update_success = false);
                    });
                }
                Err(e) => publisher.send_modify(|s| {
                    s.error_message = Some(failure("update profile", e));
                }),
            }
        });
    }
}

impl Screen for ProfileScreen {
    type State = ProfileUiState;

    fn subscribe(&self) -> watch::Receiver<ProfileUiState> {
        self.state.subscribe()
    }
}
