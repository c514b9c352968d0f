//! Favorites screen

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::types::RoutineId;
use libgymlog::WorkoutRoutine;
use tokio::sync::watch;
use tracing::warn;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesUiState {
    pub favorite_routines: Vec<WorkoutRoutine>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl Default for FavoritesUiState {
    fn default() -> Self {
        Self {
            favorite_routines: Vec::new(),
            is_loading: true,
            error_message: None,
        }
    }
}

pub struct FavoritesScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<FavoritesUiState>>,
    tasks: TaskSet,
}

impl FavoritesScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(FavoritesUiState::default()));
        let tasks = TaskSet::new();

        let mut favorites = context.repository.favorite_routines();
        let latency = context.timings.favorites_latency;
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = favorites.next().await {
                match item {
                    Ok(favorite_routines) => {
                        tokio::time::sleep(latency).await;
                        publisher.send_replace(FavoritesUiState {
                            favorite_routines,
                            is_loading: false,
                            error_message: None,
                        });
                    }
                    Err(e) => {
                        publisher.send_replace(FavoritesUiState {
                            favorite_routines: Vec::new(),
                            is_loading: false,
                            error_message: Some(failure("load favorites", e)),
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

    /// Drop a listed routine from the favorite set; unlisted ids are ignored
    pub fn remove_favorite(&self, id: RoutineId) {
        let listed = self
            .state
            .borrow()
            .favorite_routines
            .iter()
            .any(|r| r.id == id);
        if !listed {
            return;
        }

        let repository = Arc::clone(&self.context.repository);
        self.tasks.spawn(async move {
            if let Err(e) = repository.toggle_favorite(id).await {
                warn!(routine_id = id, error = %e, "Removing favorite failed");
            }
        });
    }
}

impl Screen for FavoritesScreen {
    type State = FavoritesUiState;

    fn subscribe(&self) -> watch::Receiver<FavoritesUiState> {
        self.state.subscribe()
    }
}
