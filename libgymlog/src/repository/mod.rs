//! Repository abstraction over the workout domain
//!
//! The repository is the single source of truth for routines, the favorite-id
//! set, exercises, workout logs, the user profile and user settings. It is
//! the only component permitted to mutate canonical state; every consumer
//! receives snapshots through [`Observable`] streams.
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use libgymlog::repository::{InMemoryWorkoutRepository, WorkoutRepository};
//!
//! # async fn example() -> libgymlog::Result<()> {
//! let repository = InMemoryWorkoutRepository::builtin();
//!
//! let mut favorites = repository.favorite_routines();
//! repository.toggle_favorite(1).await?;
//!
//! if let Some(snapshot) = favorites.next().await {
//!     println!("{} favorite routines", snapshot?.len());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{
    Exercise, ExerciseId, ProfileData, RoutineId, UserSettings, WorkoutLogEntry, WorkoutRoutine,
};
use crate::views::Observable;

pub mod memory;

pub use memory::InMemoryWorkoutRepository;

/// What `update_log` does when no entry carries the given id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLogPolicy {
    /// Return `RepositoryError::LogNotFound`
    #[default]
    Reject,
    /// Leave the collection untouched and report success
    Ignore,
}

/// Capability interface for workout data
///
/// Reads return live streams that yield the current snapshot immediately and
/// then every later update. Mutations complete synchronously with respect to
/// canonical state: once the returned future resolves, all active views have
/// been handed the new snapshot.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// All routines in catalog order with `is_favorite` recomputed
    fn routines(&self) -> Observable<Vec<WorkoutRoutine>>;

    /// Single routine projection; `None` for unknown ids
    fn routine_by_id(&self, id: RoutineId) -> Observable<Option<WorkoutRoutine>>;

    /// Routines currently in the favorite set
    fn favorite_routines(&self) -> Observable<Vec<WorkoutRoutine>>;

    /// Insert the id into the favorite set if absent, remove it if present
    ///
    /// Ids are not validated against the catalog.
    async fn toggle_favorite(&self, id: RoutineId) -> Result<()>;

    /// Empty the favorite set
    async fn clear_favorites(&self) -> Result<()>;

    fn exercises(&self) -> Observable<Vec<Exercise>>;

    fn exercise_by_id(&self, id: ExerciseId) -> Observable<Option<Exercise>>;

    /// All log entries in insertion order
    fn logs(&self) -> Observable<Vec<WorkoutLogEntry>>;

    fn log_by_id(&self, id: &str) -> Observable<Option<WorkoutLogEntry>>;

    /// Append a new entry
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateLogId` if an entry with the same id
    /// already exists. Callers are expected to generate unique ids.
    async fn save_log(&self, entry: WorkoutLogEntry) -> Result<()>;

    /// Replace the entry with the same id
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LogNotFound` for unknown ids when the
    /// repository runs with [`MissingLogPolicy::Reject`].
    async fn update_log(&self, entry: WorkoutLogEntry) -> Result<()>;

    /// Remove the entry with the given id; unknown ids are a no-op
    async fn delete_log(&self, id: &str) -> Result<()>;

    fn user_profile(&self) -> Observable<ProfileData>;

    async fn update_profile(&self, profile: ProfileData) -> Result<()>;

    fn user_settings(&self) -> Observable<UserSettings>;

    async fn update_dark_theme(&self, enabled: bool) -> Result<()>;

    async fn update_notifications(&self, enabled: bool) -> Result<()>;

    /// Zero is rejected with `GymlogError::InvalidInput`
    async fn update_rest_timer_duration(&self, seconds: u32) -> Result<()>;

    /// Restore [`UserSettings::default`]
    async fn reset_settings(&self) -> Result<()>;
}
