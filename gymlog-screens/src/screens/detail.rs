//! Workout detail screen

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use futures::StreamExt;
use libgymlog::scheduling::next_reminder_time;
use libgymlog::types::RoutineId;
use libgymlog::WorkoutRoutine;
use tokio::sync::watch;
use tracing::info;

use crate::context::ScreenContext;
use crate::error::{Result, ScreenError};
use crate::screen::{failure, Screen, TaskSet};

pub const ROUTINE_NOT_FOUND: &str = "Workout routine not found";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetailUiState {
    pub routine: Option<WorkoutRoutine>,
    pub is_favorite: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl Default for WorkoutDetailUiState {
    fn default() -> Self {
        Self {
            routine: None,
            is_favorite: false,
            is_loading: true,
            error_message: None,
        }
    }
}

pub struct WorkoutDetailScreen {
    context: ScreenContext,
    routine_id: RoutineId,
    state: Arc<watch::Sender<WorkoutDetailUiState>>,
    tasks: TaskSet,
}

impl WorkoutDetailScreen {
    pub fn new(context: ScreenContext, routine_id: RoutineId) -> Self {
        let state = Arc::new(watch::Sender::new(WorkoutDetailUiState::default()));
        let tasks = TaskSet::new();

        let repository = Arc::clone(&context.repository);
        let latency = context.timings.detail_latency;
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            tokio::time::sleep(latency).await;

            let mut view = repository.routine_by_id(routine_id);
            while let Some(item) = view.next().await {
                match item {
                    Ok(Some(routine)) => publisher.send_modify(|s| {
                        s.is_favorite = routine.is_favorite;
                        s.routine = Some(routine);
                        s.is_loading = false;
                    }),
                    Ok(None) => publisher.send_modify(|s| {
                        s.is_loading = false;
                        s.error_message = Some(ROUTINE_NOT_FOUND.to_string());
                    }),
                    Err(e) => {
                        publisher.send_modify(|s| {
                            s.is_loading = false;
                            s.error_message = Some(failure("load workout details", e));
                        });
                        return;
                    }
                }
            }
        });

        Self {
            context,
            routine_id,
            state,
            tasks,
        }
    }

    pub fn routine_id(&self) -> RoutineId {
        self.routine_id
    }

    pub fn toggle_favorite(&self) {
        let repository = Arc::clone(&self.context.repository);
        let publisher = Arc::clone(&self.state);
        let id = self.routine_id;

        self.tasks.spawn(async move {
            if let Err(e) = repository.toggle_favorite(id).await {
                publisher.send_modify(|s| {
                    s.error_message = Some(failure("update favorite status", e));
                });
            }
        });
    }

    /// Schedule a reminder for the next `hour:minute` in local time
    pub fn schedule_reminder(&self, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
        self.schedule_reminder_from(&Local::now(), hour, minute)
    }

    /// Schedule a reminder for the next `hour:minute` after `now`, in `now`'s zone
    ///
    /// # Errors
    ///
    /// Fails if the routine is not loaded, notifications are disabled, or
    /// the time is invalid.
    pub fn schedule_reminder_from<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        hour: u32,
        minute: u32,
    ) -> Result<DateTime<Utc>> {
        let label = self
            .state
            .borrow()
            .routine
            .as_ref()
            .map(|r| r.name.clone())
            .ok_or_else(|| ScreenError::NotLoaded("Workout routine".to_string()))?;

        if !self.context.preferences.current().notifications_enabled {
            return Err(ScreenError::NotificationsDisabled);
        }

        let at = next_reminder_time(now, hour, minute)?.with_timezone(&Utc);
        self.context.notifier.schedule_reminder(&label, at);
        info!(routine_id = self.routine_id, at = %at.to_rfc3339(), "Reminder scheduled");
        Ok(at)
    }
}

impl Screen for WorkoutDetailScreen {
    type State = WorkoutDetailUiState;

    fn subscribe(&self) -> watch::Receiver<WorkoutDetailUiState> {
        self.state.subscribe()
    }
}
