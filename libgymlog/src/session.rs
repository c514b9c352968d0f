//! In-progress workout editing
//!
//! An active workout is a [`WorkoutLogEntry`] without an end time. Every edit
//! the user makes is a [`WorkoutAction`] applied by [`reduce`], which never
//! fails: indices that do not point at an exercise or set are ignored.

use crate::types::{Exercise, PerformedExercise, WorkoutLogEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutAction {
    /// Append a catalog exercise with one set pre-filled from its targets
    AddExercise(Exercise),
    /// Append a set to an exercise, defaulting from its last set
    AddSet { exercise: usize },
    UpdateSet {
        exercise: usize,
        set: usize,
        reps: u32,
        weight: f64,
    },
    ToggleSetCompletion { exercise: usize, set: usize },
    RemoveSet { exercise: usize, set: usize },
    /// Blank notes clear the field
    SetNotes(String),
}

/// Apply an action to an in-progress entry
pub fn reduce(mut entry: WorkoutLogEntry, action: WorkoutAction) -> WorkoutLogEntry {
    match action {
        WorkoutAction::AddExercise(exercise) => {
            let mut performed = PerformedExercise::from_exercise(&exercise);
            let first = performed.next_set();
            performed.sets.push(first);
            entry.performed_exercises.push(performed);
        }
        WorkoutAction::AddSet { exercise } => {
            if let Some(performed) = entry.performed_exercises.get_mut(exercise) {
                let next = performed.next_set();
                performed.sets.push(next);
            }
        }
        WorkoutAction::UpdateSet {
            exercise,
            set,
            reps,
            weight,
        } => {
            if let Some(target) = set_mut(&mut entry, exercise, set) {
                target.reps = reps;
                target.weight = weight;
            }
        }
        WorkoutAction::ToggleSetCompletion { exercise, set } => {
            if let Some(target) = set_mut(&mut entry, exercise, set) {
                target.is_completed = !target.is_completed;
            }
        }
        WorkoutAction::RemoveSet { exercise, set } => {
            if let Some(performed) = entry.performed_exercises.get_mut(exercise) {
                if set < performed.sets.len() {
                    performed.sets.remove(set);
                }
            }
        }
        WorkoutAction::SetNotes(notes) => {
            entry.notes = if notes.trim().is_empty() {
                None
            } else {
                Some(notes)
            };
        }
    }
    entry
}

fn set_mut(
    entry: &mut WorkoutLogEntry,
    exercise: usize,
    set: usize,
) -> Option<&mut crate::types::PerformedSet> {
    entry
        .performed_exercises
        .get_mut(exercise)
        .and_then(|performed| performed.sets.get_mut(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::Utc;

    fn leg_day() -> WorkoutLogEntry {
        let catalog = Catalog::builtin();
        let routine = catalog.routines.iter().find(|r| r.id == 3).unwrap();
        WorkoutLogEntry::start_routine(routine, Utc::now())
    }

    #[test]
    fn test_add_set_uses_targets_then_last_set() {
        let entry = leg_day();
        let entry = reduce(entry, WorkoutAction::AddSet { exercise: 0 });

        let squat = &entry.performed_exercises[0];
        assert_eq!(squat.sets.len(), 1);
        assert_eq!((squat.sets[0].reps, squat.sets[0].weight), (12, 50.0));

        let entry = reduce(
            entry,
            WorkoutAction::UpdateSet {
                exercise: 0,
                set: 0,
                reps: 8,
                weight: 70.0,
            },
        );
        let entry = reduce(entry, WorkoutAction::AddSet { exercise: 0 });

        let squat = &entry.performed_exercises[0];
        assert_eq!(squat.sets.len(), 2);
        assert_eq!((squat.sets[1].reps, squat.sets[1].weight), (8, 70.0));
        assert_ne!(squat.sets[0].id, squat.sets[1].id);
        assert!(!squat.sets[1].is_completed);
    }

    #[test]
    fn test_add_custom_exercise_has_one_default_set() {
        let catalog = Catalog::builtin();
        let burpees = catalog.exercises.iter().find(|e| e.id == 11).unwrap().clone();

        let entry = reduce(
            WorkoutLogEntry::start_custom(Utc::now()),
            WorkoutAction::AddExercise(burpees),
        );

        assert_eq!(entry.performed_exercises.len(), 1);
        let performed = &entry.performed_exercises[0];
        assert_eq!(performed.exercise_id, 11);
        assert_eq!(performed.sets.len(), 1);
        assert_eq!((performed.sets[0].reps, performed.sets[0].weight), (20, 0.0));
    }

    #[test]
    fn test_toggle_completion_twice_restores() {
        let entry = reduce(leg_day(), WorkoutAction::AddSet { exercise: 1 });
        let toggle = WorkoutAction::ToggleSetCompletion {
            exercise: 1,
            set: 0,
        };

        let once = reduce(entry.clone(), toggle.clone());
        assert!(once.performed_exercises[1].sets[0].is_completed);
        assert_eq!(once.performed_exercises[1].completed_sets(), 1);

        let twice = reduce(once, toggle);
        assert_eq!(twice, entry);
    }

    #[test]
    fn test_remove_set() {
        let entry = reduce(leg_day(), WorkoutAction::AddSet { exercise: 2 });
        let entry = reduce(entry, WorkoutAction::AddSet { exercise: 2 });
        let kept = entry.performed_exercises[2].sets[1].id.clone();

        let entry = reduce(entry, WorkoutAction::RemoveSet { exercise: 2, set: 0 });

        let sets = &entry.performed_exercises[2].sets;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, kept);
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let entry = reduce(leg_day(), WorkoutAction::AddSet { exercise: 0 });

        let actions = vec![
            WorkoutAction::AddSet { exercise: 9 },
            WorkoutAction::UpdateSet {
                exercise: 0,
                set: 5,
                reps: 1,
                weight: 1.0,
            },
            WorkoutAction::UpdateSet {
                exercise: 7,
                set: 0,
                reps: 1,
                weight: 1.0,
            },
            WorkoutAction::ToggleSetCompletion {
                exercise: 0,
                set: 3,
            },
            WorkoutAction::RemoveSet { exercise: 0, set: 1 },
            WorkoutAction::RemoveSet { exercise: 4, set: 0 },
        ];

        for action in actions {
            assert_eq!(reduce(entry.clone(), action), entry);
        }
    }

    #[test]
    fn test_set_notes() {
        let entry = reduce(leg_day(), WorkoutAction::SetNotes("Pesado hoje".to_string()));
        assert_eq!(entry.notes.as_deref(), Some("Pesado hoje"));

        let entry = reduce(entry, WorkoutAction::SetNotes("   ".to_string()));
        assert_eq!(entry.notes, None);
    }
}
