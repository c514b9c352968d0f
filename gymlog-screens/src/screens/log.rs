//! Workout history screen

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::WorkoutLogEntry;
use tokio::sync::watch;
use tracing::warn;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, PartialEq)]
pub struct LogUiState {
    pub log_entries: Vec<WorkoutLogEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl Default for LogUiState {
    fn default() -> Self {
        Self {
            log_entries: Vec::new(),
            is_loading: true,
            error_message: None,
        }
    }
}

pub struct LogScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<LogUiState>>,
    tasks: TaskSet,
}

impl LogScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(LogUiState::default()));
        let tasks = TaskSet::new();

        let mut logs = context.repository.logs();
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = logs.next().await {
                match item {
                    Ok(log_entries) => {
                        publisher.send_replace(LogUiState {
                            log_entries,
                            is_loading: false,
                            error_message: None,
                        });
                    }
                    Err(e) => {
                        publisher.send_replace(LogUiState {
                            log_entries: Vec::new(),
                            is_loading: false,
                            error_message: Some(failure("load workout logs", e)),
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
        }
    }

    /// Delete an entry; unknown ids leave the list unchanged
    pub fn delete_entry(&self, id: impl Into<String>) {
        let repository = Arc::clone(&self.context.repository);
        let id = id.into();
        self.tasks.spawn(async move {
            if let Err(e) = repository.delete_log(&id).await {
                warn!(log_id = %id, error = %e, "Deleting workout log failed");
            }
        });
    }
}

impl Screen for LogScreen {
    type State = LogUiState;

    fn subscribe(&self) -> watch::Receiver<LogUiState> {
        self.state.subscribe()
    }
}
