//! Core types for GymLog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GymlogError, Result, SessionError};

/// Name given to workouts that are not based on a catalog routine
pub const CUSTOM_WORKOUT_NAME: &str = "Treino Personalizado";

pub type ExerciseId = u32;
pub type RoutineId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub description: String,
    /// Target sets when used in a routine
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRoutine {
    pub id: RoutineId,
    pub name: String,
    pub description: String,
    /// Estimated duration in minutes
    pub duration: u32,
    pub difficulty: String,
    pub category: String,
    pub exercises: Vec<Exercise>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    /// Projection of the repository's favorite set; never authoritative
    pub is_favorite: bool,
    pub rating: f32,
    pub calories_burned: u32,
}

impl WorkoutRoutine {
    /// Case-insensitive substring match over the searchable fields
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            &self.name,
            &self.description,
            &self.category,
            &self.difficulty,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformedSet {
    pub id: String,
    pub reps: u32,
    pub weight: f64,
    pub is_completed: bool,
}

impl PerformedSet {
    pub fn new(reps: u32, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reps,
            weight,
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformedExercise {
    pub id: String,
    /// Back-reference to the catalog exercise
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    /// Performance order
    pub sets: Vec<PerformedSet>,
    pub target_sets: u32,
    pub target_reps: u32,
    pub target_weight: f64,
}

impl PerformedExercise {
    /// Fresh performed instance of a catalog exercise, with no sets yet
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            sets: Vec::new(),
            target_sets: exercise.sets,
            target_reps: exercise.reps,
            target_weight: exercise.weight,
        }
    }

    /// Set pre-filled from the last performed set, else from the targets
    pub fn next_set(&self) -> PerformedSet {
        match self.sets.last() {
            Some(last) => PerformedSet::new(last.reps, last.weight),
            None => PerformedSet::new(self.target_reps, self.target_weight),
        }
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.is_completed).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogEntry {
    pub id: String,
    pub routine_id: Option<RoutineId>,
    pub workout_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_millis: i64,
    pub performed_exercises: Vec<PerformedExercise>,
    pub notes: Option<String>,
    pub calories_burned: Option<u32>,
}

impl WorkoutLogEntry {
    /// Open a session for a catalog routine
    pub fn start_routine(routine: &WorkoutRoutine, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            routine_id: Some(routine.id),
            workout_name: routine.name.clone(),
            start_time,
            end_time: None,
            duration_millis: 0,
            performed_exercises: routine
                .exercises
                .iter()
                .map(PerformedExercise::from_exercise)
                .collect(),
            notes: None,
            calories_burned: Some(routine.calories_burned),
        }
    }

    /// Open an empty custom session
    pub fn start_custom(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            routine_id: None,
            workout_name: CUSTOM_WORKOUT_NAME.to_string(),
            start_time,
            end_time: None,
            duration_millis: 0,
            performed_exercises: Vec::new(),
            notes: None,
            calories_burned: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Stamp the end time and derive the duration
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyCompleted` when the entry already has an
    /// end time and `SessionError::EndBeforeStart` when `end_time` precedes
    /// the start.
    pub fn complete(&mut self, end_time: DateTime<Utc>) -> Result<()> {
        if self.end_time.is_some() {
            return Err(GymlogError::Session(SessionError::AlreadyCompleted(
                self.id.clone(),
            )));
        }
        if end_time < self.start_time {
            return Err(GymlogError::Session(SessionError::EndBeforeStart(
                self.id.clone(),
            )));
        }

        self.duration_millis = (end_time - self.start_time).num_milliseconds();
        self.end_time = Some(end_time);
        Ok(())
    }

    pub fn total_sets(&self) -> usize {
        self.performed_exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Sum of reps × weight over completed sets
    pub fn total_volume(&self) -> f64 {
        self.performed_exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.is_completed)
            .map(|s| s.reps as f64 * s.weight)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub id: u32,
    pub name: String,
    /// Centimetres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub dark_theme: bool,
    pub notifications_enabled: bool,
    /// Seconds
    pub rest_timer_duration: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            dark_theme: false,
            notifications_enabled: true,
            rest_timer_duration: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: u32,
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn squat() -> Exercise {
        Exercise {
            id: 3,
            name: "Agachamento".to_string(),
            description: "Exercício de agachamento com barra.".to_string(),
            sets: 3,
            reps: 12,
            weight: 50.0,
        }
    }

    #[test]
    fn test_next_set_defaults_from_targets() {
        let performed = PerformedExercise::from_exercise(&squat());
        let set = performed.next_set();
        assert_eq!(set.reps, 12);
        assert_eq!(set.weight, 50.0);
        assert!(!set.is_completed);
    }

    #[test]
    fn test_next_set_copies_last_set() {
        let mut performed = PerformedExercise::from_exercise(&squat());
        performed.sets.push(PerformedSet::new(8, 62.5));
        let set = performed.next_set();
        assert_eq!(set.reps, 8);
        assert_eq!(set.weight, 62.5);
    }

    #[test]
    fn test_complete_sets_duration() {
        let start = Utc::now();
        let mut entry = WorkoutLogEntry::start_custom(start);
        let end = start + Duration::milliseconds(3_723_456);

        entry.complete(end).unwrap();

        assert_eq!(entry.end_time, Some(end));
        assert_eq!(entry.duration_millis, 3_723_456);
        assert!(entry.is_completed());
    }

    #[test]
    fn test_complete_with_zero_elapsed() {
        let start = Utc::now();
        let mut entry = WorkoutLogEntry::start_custom(start);
        entry.complete(start).unwrap();
        assert_eq!(entry.duration_millis, 0);
    }

    #[test]
    fn test_complete_twice_is_rejected() {
        let start = Utc::now();
        let mut entry = WorkoutLogEntry::start_custom(start);
        let first_end = start + Duration::seconds(10);
        entry.complete(first_end).unwrap();

        let err = entry.complete(start + Duration::seconds(20)).unwrap_err();
        assert!(matches!(
            err,
            GymlogError::Session(SessionError::AlreadyCompleted(_))
        ));
        assert_eq!(entry.end_time, Some(first_end));
        assert_eq!(entry.duration_millis, 10_000);
    }

    #[test]
    fn test_complete_before_start_is_rejected() {
        let start = Utc::now();
        let mut entry = WorkoutLogEntry::start_custom(start);
        let err = entry.complete(start - Duration::seconds(1)).unwrap_err();
        assert!(matches!(
            err,
            GymlogError::Session(SessionError::EndBeforeStart(_))
        ));
        assert!(entry.end_time.is_none());
    }

    #[test]
    fn test_volume_counts_completed_sets_only() {
        let mut entry = WorkoutLogEntry::start_custom(Utc::now());
        let mut performed = PerformedExercise::from_exercise(&squat());
        let mut done = PerformedSet::new(10, 50.0);
        done.is_completed = true;
        performed.sets.push(done);
        performed.sets.push(PerformedSet::new(10, 50.0));
        entry.performed_exercises.push(performed);

        assert_eq!(entry.total_sets(), 2);
        assert_eq!(entry.total_volume(), 500.0);
    }

    #[test]
    fn test_user_settings_defaults() {
        let settings = UserSettings::default();
        assert!(!settings.dark_theme);
        assert!(settings.notifications_enabled);
        assert_eq!(settings.rest_timer_duration, 60);
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = WorkoutLogEntry::start_custom(Utc::now());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("Treino Personalizado"));
        let back: WorkoutLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
