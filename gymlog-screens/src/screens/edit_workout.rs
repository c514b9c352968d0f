//! Edit a stored workout

use std::sync::Arc;

use libgymlog::session::WorkoutAction;
use libgymlog::views::current;
use libgymlog::WorkoutLogEntry;
use tokio::sync::watch;
use tracing::info;

use super::apply_action;
use crate::context::ScreenContext;
use crate::error::{Result, ScreenError};
use crate::screen::{failure, Screen, TaskSet};

pub const LOG_NOT_FOUND: &str = "Workout log not found";

#[derive(Debug, Clone, PartialEq)]
pub struct EditWorkoutUiState {
    /// Working copy; the stored entry changes only on save
    pub entry: Option<WorkoutLogEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub saved: bool,
}

impl Default for EditWorkoutUiState {
    fn default() -> Self {
        Self {
            entry: None,
            is_loading: true,
            error_message: None,
            saved: false,
        }
    }
}

pub struct EditWorkoutScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<EditWorkoutUiState>>,
    _tasks: TaskSet,
}

impl EditWorkoutScreen {
    pub fn new(context: ScreenContext, log_id: impl Into<String>) -> Self {
        let state = Arc::new(watch::Sender::new(EditWorkoutUiState::default()));
        let tasks = TaskSet::new();

        let view = context.repository.log_by_id(&log_id.into());
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            let loaded = current(view).await;
            publisher.send_modify(|s| {
                s.is_loading = false;
                match loaded {
                    Ok(Some(entry)) => s.entry = Some(entry),
                    Ok(None) => s.error_message = Some(LOG_NOT_FOUND.to_string()),
                    Err(e) => s.error_message = Some(failure("load workout", e)),
                }
            });
        });

        Self {
            context,
            state,
            _tasks: tasks,
        }
    }

    /// Apply an edit to the working copy
    pub fn dispatch(&self, action: WorkoutAction) {
        self.state.send_if_modified(|s| {
            let changed = apply_action(&mut s.entry, action);
            if changed {
                s.saved = false;
            }
            changed
        });
    }

    /// Write the working copy back to the log
    pub async fn save(&self) -> Result<()> {
        let entry = self
            .state
            .borrow()
            .entry
            .clone()
            .ok_or_else(|| ScreenError::NotLoaded("Workout log".to_string()))?;

        match self.context.repository.update_log(entry.clone()).await {
            Ok(()) => {
                info!(log_id = %entry.id, "Workout log edited");
                self.state.send_modify(|s| {
                    s.saved = true;
                    s.error_message = None;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.error_message = Some(failure("save workout", &e));
                });
                Err(e.into())
            }
        }
    }
}

impl Screen for EditWorkoutScreen {
    type State = EditWorkoutUiState;

    fn subscribe(&self) -> watch::Receiver<EditWorkoutUiState> {
        self.state.subscribe()
    }
}
