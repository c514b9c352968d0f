//! In-memory repository backed by `tokio::sync::watch` channels
//!
//! Each canonical collection lives in its own watch channel. Mutations go
//! through `send_modify`/`send_if_modified`, so the update and the
//! publication of the new snapshot happen under the channel's lock and
//! subscribers never observe a half-applied change.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use super::{MissingLogPolicy, WorkoutRepository};
use crate::catalog::Catalog;
use crate::error::{GymlogError, RepositoryError, Result};
use crate::types::{
    Exercise, ExerciseId, ProfileData, RoutineId, UserSettings, WorkoutLogEntry, WorkoutRoutine,
};
use crate::views::{self, Observable};

pub struct InMemoryWorkoutRepository {
    routines: watch::Sender<Vec<WorkoutRoutine>>,
    favorites: watch::Sender<BTreeSet<RoutineId>>,
    exercises: watch::Sender<Vec<Exercise>>,
    logs: watch::Sender<Vec<WorkoutLogEntry>>,
    profile: watch::Sender<ProfileData>,
    settings: watch::Sender<UserSettings>,
    /// What `reset_settings` restores
    initial_settings: UserSettings,
    missing_log_policy: MissingLogPolicy,
}

impl InMemoryWorkoutRepository {
    /// Seed a repository from a catalog
    ///
    /// The initial favorite set is taken from the routines flagged favorite
    /// in the catalog; the flag on the stored routines is cleared so that
    /// the favorite set stays the only authority.
    pub fn new(catalog: Catalog) -> Self {
        let favorites: BTreeSet<RoutineId> = catalog.seed_favorites().into_iter().collect();
        let routines = catalog
            .routines
            .into_iter()
            .map(|routine| WorkoutRoutine {
                is_favorite: false,
                ..routine
            })
            .collect();

        Self {
            routines: watch::Sender::new(routines),
            favorites: watch::Sender::new(favorites),
            exercises: watch::Sender::new(catalog.exercises),
            logs: watch::Sender::new(catalog.logs),
            profile: watch::Sender::new(catalog.profile),
            settings: watch::Sender::new(UserSettings::default()),
            initial_settings: UserSettings::default(),
            missing_log_policy: MissingLogPolicy::default(),
        }
    }

    /// Repository seeded with the built-in catalog
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }

    /// Replace the initial user settings, which `reset_settings` restores
    pub fn with_settings(mut self, settings: UserSettings) -> Self {
        self.settings.send_replace(settings.clone());
        self.initial_settings = settings;
        self
    }

    pub fn with_missing_log_policy(mut self, policy: MissingLogPolicy) -> Self {
        self.missing_log_policy = policy;
        self
    }

    pub fn missing_log_policy(&self) -> MissingLogPolicy {
        self.missing_log_policy
    }

    /// Current favorite ids (snapshot)
    pub fn favorite_ids(&self) -> BTreeSet<RoutineId> {
        self.favorites.borrow().clone()
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    fn routines(&self) -> Observable<Vec<WorkoutRoutine>> {
        let catalog = views::watch_stream(self.routines.subscribe());
        let favorites = views::watch_stream(self.favorites.subscribe());

        views::map_view(
            views::combine_latest(catalog, favorites),
            |(routines, favorites)| views::project_favorites(&routines, &favorites),
        )
    }

    fn routine_by_id(&self, id: RoutineId) -> Observable<Option<WorkoutRoutine>> {
        views::map_view(self.routines(), move |routines| {
            routines.into_iter().find(|r| r.id == id)
        })
    }

    fn favorite_routines(&self) -> Observable<Vec<WorkoutRoutine>> {
        views::map_view(self.routines(), |routines| {
            routines.into_iter().filter(|r| r.is_favorite).collect()
        })
    }

    async fn toggle_favorite(&self, id: RoutineId) -> Result<()> {
        self.favorites.send_modify(|favorites| {
            if !favorites.remove(&id) {
                favorites.insert(id);
            }
        });
        debug!(routine_id = id, "Toggled favorite");
        Ok(())
    }

    async fn clear_favorites(&self) -> Result<()> {
        self.favorites.send_replace(BTreeSet::new());
        debug!("Cleared favorites");
        Ok(())
    }

    fn exercises(&self) -> Observable<Vec<Exercise>> {
        views::watch_stream(self.exercises.subscribe())
    }

    fn exercise_by_id(&self, id: ExerciseId) -> Observable<Option<Exercise>> {
        views::map_view(self.exercises(), move |exercises| {
            exercises.into_iter().find(|e| e.id == id)
        })
    }

    fn logs(&self) -> Observable<Vec<WorkoutLogEntry>> {
        views::watch_stream(self.logs.subscribe())
    }

    fn log_by_id(&self, id: &str) -> Observable<Option<WorkoutLogEntry>> {
        let id = id.to_string();
        views::map_view(self.logs(), move |logs| {
            logs.into_iter().find(|entry| entry.id == id)
        })
    }

    async fn save_log(&self, entry: WorkoutLogEntry) -> Result<()> {
        let id = entry.id.clone();
        let mut outcome: Result<()> = Ok(());

        self.logs.send_if_modified(|logs| {
            if logs.iter().any(|existing| existing.id == entry.id) {
                outcome = Err(RepositoryError::DuplicateLogId(entry.id.clone()).into());
                return false;
            }
            logs.push(entry);
            true
        });

        if outcome.is_ok() {
            debug!(log_id = %id, "Saved workout log");
        }
        outcome
    }

    async fn update_log(&self, entry: WorkoutLogEntry) -> Result<()> {
        let id = entry.id.clone();
        let mut found = false;

        self.logs.send_if_modified(|logs| {
            match logs.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => {
                    *existing = entry;
                    found = true;
                    true
                }
                None => false,
            }
        });

        if found {
            debug!(log_id = %id, "Updated workout log");
            return Ok(());
        }

        match self.missing_log_policy {
            MissingLogPolicy::Reject => Err(RepositoryError::LogNotFound(id).into()),
            MissingLogPolicy::Ignore => {
                debug!(log_id = %id, "Ignored update for unknown workout log");
                Ok(())
            }
        }
    }

    async fn delete_log(&self, id: &str) -> Result<()> {
        let removed = self.logs.send_if_modified(|logs| {
            let before = logs.len();
            logs.retain(|entry| entry.id != id);
            logs.len() != before
        });
        debug!(log_id = %id, removed, "Deleted workout log");
        Ok(())
    }

    fn user_profile(&self) -> Observable<ProfileData> {
        views::watch_stream(self.profile.subscribe())
    }

    async fn update_profile(&self, profile: ProfileData) -> Result<()> {
        debug!(name = %profile.name, "Updated profile");
        self.profile.send_replace(profile);
        Ok(())
    }

    fn user_settings(&self) -> Observable<UserSettings> {
        views::watch_stream(self.settings.subscribe())
    }

    async fn update_dark_theme(&self, enabled: bool) -> Result<()> {
        self.settings.send_modify(|s| s.dark_theme = enabled);
        debug!(enabled, "Updated dark theme setting");
        Ok(())
    }

    async fn update_notifications(&self, enabled: bool) -> Result<()> {
        self.settings.send_modify(|s| s.notifications_enabled = enabled);
        debug!(enabled, "Updated notifications setting");
        Ok(())
    }

    async fn update_rest_timer_duration(&self, seconds: u32) -> Result<()> {
        if seconds == 0 {
            return Err(GymlogError::InvalidInput(
                "Rest timer duration must be at least one second".to_string(),
            ));
        }
        self.settings.send_modify(|s| s.rest_timer_duration = seconds);
        debug!(seconds, "Updated rest timer duration");
        Ok(())
    }

    async fn reset_settings(&self) -> Result<()> {
        self.settings.send_replace(self.initial_settings.clone());
        debug!("Reset user settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GymlogError;
    use futures::StreamExt;

    async fn first<T>(mut view: Observable<T>) -> T {
        view.next().await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_seed_favorites_are_projected() {
        let repo = InMemoryWorkoutRepository::builtin();
        let routines = first(repo.routines()).await;

        let favorites: Vec<_> = routines.iter().filter(|r| r.is_favorite).map(|r| r.id).collect();
        assert_eq!(favorites, vec![3, 5]);
        assert_eq!(repo.favorite_ids(), BTreeSet::from([3, 5]));
    }

    #[tokio::test]
    async fn test_toggle_favorite_twice_restores_set() {
        let repo = InMemoryWorkoutRepository::builtin();
        let before = repo.favorite_ids();

        for id in [1, 3, 42] {
            repo.toggle_favorite(id).await.unwrap();
            repo.toggle_favorite(id).await.unwrap();
            assert_eq!(repo.favorite_ids(), before);
        }
    }

    #[tokio::test]
    async fn test_toggle_unknown_routine_is_silent() {
        let repo = InMemoryWorkoutRepository::builtin();
        repo.toggle_favorite(99).await.unwrap();

        assert!(repo.favorite_ids().contains(&99));
        let favorites = first(repo.favorite_routines()).await;
        assert_eq!(favorites.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_favorites() {
        let repo = InMemoryWorkoutRepository::builtin();
        repo.clear_favorites().await.unwrap();
        assert!(first(repo.favorite_routines()).await.is_empty());
    }

    #[tokio::test]
    async fn test_routine_by_id() {
        let repo = InMemoryWorkoutRepository::builtin();
        let legs = first(repo.routine_by_id(3)).await.unwrap();
        assert_eq!(legs.name, "Treino de Pernas");
        assert!(legs.is_favorite);

        assert!(first(repo.routine_by_id(77)).await.is_none());
    }

    #[tokio::test]
    async fn test_exercise_by_id() {
        let repo = InMemoryWorkoutRepository::builtin();
        assert_eq!(first(repo.exercise_by_id(8)).await.unwrap().name, "Leg Press");
        assert!(first(repo.exercise_by_id(0)).await.is_none());
        assert_eq!(first(repo.exercises()).await.len(), 12);
    }

    #[tokio::test]
    async fn test_duplicate_log_id_is_rejected() {
        let repo = InMemoryWorkoutRepository::new(Catalog::without_logs());
        let entry = WorkoutLogEntry::start_custom(chrono::Utc::now());

        repo.save_log(entry.clone()).await.unwrap();
        let err = repo.save_log(entry).await.unwrap_err();

        assert!(matches!(
            err,
            GymlogError::Repository(RepositoryError::DuplicateLogId(_))
        ));
        assert_eq!(first(repo.logs()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_log_rejected_by_default() {
        let repo = InMemoryWorkoutRepository::new(Catalog::without_logs());
        let entry = WorkoutLogEntry::start_custom(chrono::Utc::now());

        let err = repo.update_log(entry).await.unwrap_err();
        assert!(matches!(
            err,
            GymlogError::Repository(RepositoryError::LogNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_log_ignored_when_configured() {
        let repo = InMemoryWorkoutRepository::new(Catalog::without_logs())
            .with_missing_log_policy(MissingLogPolicy::Ignore);
        let entry = WorkoutLogEntry::start_custom(chrono::Utc::now());

        repo.update_log(entry).await.unwrap();
        assert!(first(repo.logs()).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = InMemoryWorkoutRepository::new(Catalog::without_logs());
        let a = WorkoutLogEntry::start_custom(chrono::Utc::now());
        let b = WorkoutLogEntry::start_custom(chrono::Utc::now());
        repo.save_log(a.clone()).await.unwrap();
        repo.save_log(b.clone()).await.unwrap();

        let mut edited = a.clone();
        edited.notes = Some("Pesado hoje".to_string());
        repo.update_log(edited.clone()).await.unwrap();

        let logs = first(repo.logs()).await;
        assert_eq!(logs, vec![edited, b]);
    }

    #[tokio::test]
    async fn test_settings_field_updates_and_reset() {
        let repo = InMemoryWorkoutRepository::builtin();
        repo.update_dark_theme(true).await.unwrap();
        repo.update_notifications(false).await.unwrap();
        repo.update_rest_timer_duration(90).await.unwrap();

        let settings = first(repo.user_settings()).await;
        assert_eq!(
            settings,
            UserSettings {
                dark_theme: true,
                notifications_enabled: false,
                rest_timer_duration: 90,
            }
        );

        repo.reset_settings().await.unwrap();
        assert_eq!(first(repo.user_settings()).await, UserSettings::default());
    }

    #[tokio::test]
    async fn test_zero_rest_timer_duration_rejected() {
        let repo = InMemoryWorkoutRepository::builtin();
        let result = repo.update_rest_timer_duration(0).await;
        assert!(matches!(result, Err(GymlogError::InvalidInput(_))));
        assert_eq!(first(repo.user_settings()).await.rest_timer_duration, 60);
    }

    #[tokio::test]
    async fn test_reset_restores_seeded_settings() {
        let seeded = UserSettings {
            rest_timer_duration: 45,
            ..UserSettings::default()
        };
        let repo = InMemoryWorkoutRepository::builtin().with_settings(seeded.clone());
        assert_eq!(first(repo.user_settings()).await, seeded);

        repo.update_rest_timer_duration(120).await.unwrap();
        repo.reset_settings().await.unwrap();
        assert_eq!(first(repo.user_settings()).await, seeded);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = InMemoryWorkoutRepository::builtin();
        let mut profile = first(repo.user_profile()).await;
        profile.weight = 72.5;

        repo.update_profile(profile.clone()).await.unwrap();
        assert_eq!(first(repo.user_profile()).await, profile);
    }
}
