//! Home screen: routine list with inline search and favoriting

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::StreamExt;
use libgymlog::types::RoutineId;
use libgymlog::views::{combine_latest3, search_routines, watch_stream, BlankQuery};
use libgymlog::WorkoutRoutine;
use tokio::sync::watch;
use tracing::warn;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, PartialEq)]
pub struct HomeUiState {
    pub routines: Vec<WorkoutRoutine>,
    pub search_query: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Routines whose favorite toggle has not completed yet
    pub favoriting_in_progress: BTreeSet<RoutineId>,
}

impl Default for HomeUiState {
    fn default() -> Self {
        Self {
            routines: Vec::new(),
            search_query: String::new(),
            is_loading: true,
            error_message: None,
            favoriting_in_progress: BTreeSet::new(),
        }
    }
}

pub struct HomeScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<HomeUiState>>,
    query: watch::Sender<String>,
    in_flight: Arc<watch::Sender<BTreeSet<RoutineId>>>,
    tasks: TaskSet,
}

impl HomeScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(HomeUiState::default()));
        let query = watch::Sender::new(String::new());
        let in_flight = Arc::new(watch::Sender::new(BTreeSet::new()));
        let tasks = TaskSet::new();

        let mut source = combine_latest3(
            context.repository.routines(),
            watch_stream(query.subscribe()),
            watch_stream(in_flight.subscribe()),
        );
        let latency = context.timings.home_latency;
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = source.next().await {
                match item {
                    Ok((routines, query, favoriting)) => {
                        tokio::time::sleep(latency).await;
                        let routines = search_routines(&routines, &query, BlankQuery::MatchAll);
                        publisher.send_replace(HomeUiState {
                            routines,
                            search_query: query,
                            is_loading: false,
                            error_message: None,
                            favoriting_in_progress: favoriting,
                        });
                    }
                    Err(e) => {
                        publisher.send_replace(HomeUiState {
                            is_loading: false,
                            error_message: Some(failure("load routines", e)),
                            ..HomeUiState::default()
                        });
                        return;
                    }
                }
            }
        });

        Self {
            context,
            state,
            query,
            in_flight,
            tasks,
        }
    }

    pub fn on_search_query_change(&self, query: impl Into<String>) {
        self.query.send_replace(query.into());
    }

    /// Mark the routine in flight, wait, toggle it, then clear the mark
    ///
    /// A request for a routine that is already in flight is ignored. The mark
    /// is cleared even when the repository call fails; the favorite set is
    /// not rolled back.
    pub fn toggle_favorite(&self, id: RoutineId) {
        if !self.in_flight.send_if_modified(|ids| ids.insert(id)) {
            return;
        }
        let repository = Arc::clone(&self.context.repository);
        let in_flight = Arc::clone(&self.in_flight);
        let latency = self.context.timings.favorite_toggle_latency;

        self.tasks.spawn(async move {
            tokio::time::sleep(latency).await;
            if let Err(e) = repository.toggle_favorite(id).await {
                warn!(routine_id = id, error = %e, "Favorite toggle failed");
            }
            in_flight.send_modify(|ids| {
                ids.remove(&id);
            });
        });
    }
}

impl Screen for HomeScreen {
    type State = HomeUiState;

    fn subscribe(&self) -> watch::Receiver<HomeUiState> {
        self.state.subscribe()
    }
}
