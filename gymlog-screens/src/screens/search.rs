//! Dedicated search screen
//!
//! A blank query shows nothing and never loads. A non-blank query publishes
//! a loading state, waits the search latency, then publishes the matches.

use std::sync::Arc;

use futures::StreamExt;
use libgymlog::types::RoutineId;
use libgymlog::views::{combine_latest, is_blank, search_routines, watch_stream, BlankQuery};
use libgymlog::WorkoutRoutine;
use tokio::sync::watch;
use tracing::warn;

use crate::context::ScreenContext;
use crate::screen::{failure, Screen, TaskSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUiState {
    pub search_query: String,
    pub search_results: Vec<WorkoutRoutine>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

pub struct SearchScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<SearchUiState>>,
    query: watch::Sender<String>,
    tasks: TaskSet,
}

impl SearchScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(SearchUiState::default()));
        let query = watch::Sender::new(String::new());
        let tasks = TaskSet::new();

        let mut source = combine_latest(
            watch_stream(query.subscribe()),
            context.repository.routines(),
        );
        let latency = context.timings.search_latency;
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while let Some(item) = source.next().await {
                let (query, routines) = match item {
                    Ok(pair) => pair,
                    Err(e) => {
                        publisher.send_replace(SearchUiState {
                            error_message: Some(failure("search", e)),
                            ..SearchUiState::default()
                        });
                        return;
                    }
                };

                if is_blank(&query) {
                    publisher.send_replace(SearchUiState {
                        search_query: query,
                        ..SearchUiState::default()
                    });
                    continue;
                }

                publisher.send_modify(|s| {
                    s.search_query = query.clone();
                    s.is_loading = true;
                });
                tokio::time::sleep(latency).await;

                let search_results = search_routines(&routines, &query, BlankQuery::MatchNone);
                publisher.send_replace(SearchUiState {
                    search_query: query,
                    search_results,
                    is_loading: false,
                    error_message: None,
                });
            }
        });

        Self {
            context,
            state,
            query,
            tasks,
        }
    }

    pub fn on_search_query_change(&self, query: impl Into<String>) {
        self.query.send_replace(query.into());
    }

    pub fn toggle_favorite(&self, id: RoutineId) {
        let repository = Arc::clone(&self.context.repository);
        self.tasks.spawn(async move {
            if let Err(e) = repository.toggle_favorite(id).await {
                warn!(routine_id = id, error = %e, "Favorite toggle failed");
            }
        });
    }
}

impl Screen for SearchScreen {
    type State = SearchUiState;

    fn subscribe(&self) -> watch::Receiver<SearchUiState> {
        self.state.subscribe()
    }
}
