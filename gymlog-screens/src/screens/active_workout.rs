//! Active workout screen
//!
//! Owns the in-progress log entry and a rest timer. Edits go through
//! [`WorkoutAction`]s; [`complete`](ActiveWorkoutScreen::complete) stamps the
//! end time and saves the entry once.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use libgymlog::session::WorkoutAction;
use libgymlog::timer::{RestTimer, RestTimerState};
use libgymlog::types::RoutineId;
use libgymlog::views::{current, search_exercises};
use libgymlog::{Exercise, WorkoutLogEntry, WorkoutRoutine};
use tokio::sync::watch;
use tracing::{debug, info};

use super::apply_action;
use crate::context::ScreenContext;
use crate::error::{Result, ScreenError};
use crate::screen::{failure, Screen, TaskSet};

pub const ROUTINE_NOT_FOUND: &str = "Routine not found";

/// What the session is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutTarget {
    Routine(RoutineId),
    Custom,
}

impl FromStr for WorkoutTarget {
    type Err = ScreenError;

    /// `"custom"` or a routine id
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("custom") {
            return Ok(WorkoutTarget::Custom);
        }
        s.parse()
            .map(WorkoutTarget::Routine)
            .map_err(|_| ScreenError::InvalidInput(format!("Unknown workout target: '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWorkoutUiState {
    pub workout_routine: Option<WorkoutRoutine>,
    pub is_custom_workout: bool,
    /// `None` only when the requested routine does not exist
    pub entry: Option<WorkoutLogEntry>,
    pub timer: RestTimerState,
    pub error_message: Option<String>,
    /// Set once the entry has been written to the log
    pub saved: bool,
}

pub struct ActiveWorkoutScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<ActiveWorkoutUiState>>,
    timer: RestTimer,
    _tasks: TaskSet,
}

impl ActiveWorkoutScreen {
    /// Open a session; the start time is now
    ///
    /// The rest timer length comes from the user's settings.
    pub async fn start(context: ScreenContext, target: WorkoutTarget) -> Result<Self> {
        let settings = current(context.repository.user_settings()).await?;
        let timer = RestTimer::new(
            settings.rest_timer_duration,
            context.timer_step,
            Arc::clone(&context.notifier),
        )?;

        let now = Utc::now();
        let (workout_routine, entry, error_message) = match target {
            WorkoutTarget::Custom => (None, Some(WorkoutLogEntry::start_custom(now)), None),
            WorkoutTarget::Routine(id) => {
                match current(context.repository.routine_by_id(id)).await? {
                    Some(routine) => {
                        let entry = WorkoutLogEntry::start_routine(&routine, now);
                        (Some(routine), Some(entry), None)
                    }
                    None => (None, None, Some(ROUTINE_NOT_FOUND.to_string())),
                }
            }
        };

        if let Some(entry) = &entry {
            info!(log_id = %entry.id, workout = %entry.workout_name, "Workout started");
        }

        let state = Arc::new(watch::Sender::new(ActiveWorkoutUiState {
            workout_routine,
            is_custom_workout: target == WorkoutTarget::Custom,
            entry,
            timer: timer.state(),
            error_message,
            saved: false,
        }));

        let tasks = TaskSet::new();
        let mut timer_rx = timer.subscribe();
        let publisher = Arc::clone(&state);
        tasks.spawn(async move {
            while timer_rx.changed().await.is_ok() {
                let snapshot = *timer_rx.borrow_and_update();
                publisher.send_modify(|s| s.timer = snapshot);
            }
        });

        Ok(Self {
            context,
            state,
            timer,
            _tasks: tasks,
        })
    }

    /// Apply an edit; ignored once saved or when nothing is loaded
    ///
    /// Marking a set completed restarts the rest timer from its full length.
    pub fn dispatch(&self, action: WorkoutAction) {
        let toggled = match &action {
            WorkoutAction::ToggleSetCompletion { exercise, set } => Some((*exercise, *set)),
            _ => None,
        };
        let mut set_completed = false;
        self.state.send_if_modified(|s| {
            if s.saved {
                return false;
            }
            let changed = apply_action(&mut s.entry, action);
            if let (true, Some((exercise, set))) = (changed, toggled) {
                set_completed = s
                    .entry
                    .as_ref()
                    .and_then(|e| e.performed_exercises.get(exercise))
                    .and_then(|p| p.sets.get(set))
                    .is_some_and(|done| done.is_completed);
            }
            changed
        });

        if set_completed {
            debug!(seconds = self.timer.state().total, "Set completed, rest timer restarted");
            self.timer.reset();
            self.timer.start();
        }
    }

    pub fn add_exercise(&self, exercise: Exercise) {
        self.dispatch(WorkoutAction::AddExercise(exercise));
    }

    pub fn add_set(&self, exercise: usize) {
        self.dispatch(WorkoutAction::AddSet { exercise });
    }

    pub fn update_set(&self, exercise: usize, set: usize, reps: u32, weight: f64) {
        self.dispatch(WorkoutAction::UpdateSet {
            exercise,
            set,
            reps,
            weight,
        });
    }

    pub fn toggle_set_completion(&self, exercise: usize, set: usize) {
        self.dispatch(WorkoutAction::ToggleSetCompletion { exercise, set });
    }

    pub fn remove_set(&self, exercise: usize, set: usize) {
        self.dispatch(WorkoutAction::RemoveSet { exercise, set });
    }

    /// Catalog exercises for the "add exercise" picker, filtered by name
    pub async fn available_exercises(&self, query: &str) -> Result<Vec<Exercise>> {
        let exercises = current(self.context.repository.exercises()).await?;
        Ok(search_exercises(&exercises, query))
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.timer
    }

    /// Finish the session and write it to the log
    ///
    /// # Errors
    ///
    /// Fails if no session is loaded, the session was already completed, or
    /// the repository rejects the entry. A repository failure is also
    /// published as `error_message`.
    pub async fn complete(&self, notes: &str) -> Result<WorkoutLogEntry> {
        let entry = self
            .state
            .borrow()
            .entry
            .clone()
            .ok_or_else(|| ScreenError::NotLoaded("Workout".to_string()))?;

        let mut entry = libgymlog::session::reduce(entry, WorkoutAction::SetNotes(notes.to_string()));
        entry.complete(Utc::now())?;
        self.timer.pause();

        if let Err(e) = self.context.repository.save_log(entry.clone()).await {
            self.state.send_modify(|s| {
                s.error_message = Some(failure("save workout", &e));
            });
            return Err(e.into());
        }

        info!(
            log_id = %entry.id,
            duration_ms = entry.duration_millis,
            sets = entry.total_sets(),
            "Workout completed"
        );
        self.state.send_modify(|s| {
            s.entry = Some(entry.clone());
            s.saved = true;
            s.error_message = None;
        });
        Ok(entry)
    }
}

impl Screen for ActiveWorkoutScreen {
    type State = ActiveWorkoutUiState;

    fn subscribe(&self) -> watch::Receiver<ActiveWorkoutUiState> {
        self.state.subscribe()
    }
}
