//! Start-workout picker

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::WorkoutRoutine;
use tokio::sync::watch;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, PartialEq)]
pub struct StartWorkoutUiState {
    pub available_routines: Vec<WorkoutRoutine>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl Default for StartWorkoutUiState {
    fn default() -> Self {
        Self {
            available_routines: Vec::new(),
            is_loading: true,
            error_message: None,
        }
    }
}

pub struct StartWorkoutScreen {
    state: Arc<watch::Sender<StartWorkoutUiState>>,
    _tasks: TaskSet,
}

impl StartWorkoutScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(StartWorkoutUiState::default()));
        let tasks = TaskSet::new();

        let mut routines = context.repository.routines();
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = routines.next().await {
                let next = match item {
                    Ok(available_routines) => StartWorkoutUiState {
                        available_routines,
                        is_loading: false,
                        error_message: None,
                    },
                    Err(e) => StartWorkoutUiState {
                        available_routines: Vec::new(),
                        is_loading: false,
                        error_message: Some(failure("load workout routines", e)),
                    },
                };
                let failed = next.error_message.is_some();
                publisher.send_replace(next);
                if failed {
                    return;
                }
            }
        });

        Self {
            state,
            _tasks: tasks,
        }
    }
}

impl Screen for StartWorkoutScreen {
    type State = StartWorkoutUiState;

    fn subscribe(&self) -> watch::Receiver<StartWorkoutUiState> {
        self.state.subscribe()
    }
}
