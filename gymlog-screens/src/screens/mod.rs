//! One state holder per screen

pub mod account;
pub mod active_workout;
pub mod detail;
pub mod edit_workout;
pub mod favorites;
pub mod help;
pub mod home;
pub mod log;
pub mod profile;
pub mod search;
pub mod settings;
pub mod start_workout;

pub use account::{AccountScreen, AccountUiState};
pub use active_workout::{ActiveWorkoutScreen, ActiveWorkoutUiState, WorkoutTarget};
pub use detail::{WorkoutDetailScreen, WorkoutDetailUiState};
pub use edit_workout::{EditWorkoutScreen, EditWorkoutUiState};
pub use favorites::{FavoritesScreen, FavoritesUiState};
pub use help::{HelpScreen, HelpUiState};
pub use home::{HomeScreen, HomeUiState};
pub use log::{LogScreen, LogUiState};
pub use profile::{ProfileScreen, ProfileUiState};
pub use search::{SearchScreen, SearchUiState};
pub use settings::{SettingsScreen, SettingsUiState};
pub use start_workout::{StartWorkoutScreen, StartWorkoutUiState};

use libgymlog::session::{reduce, WorkoutAction};
use libgymlog::WorkoutLogEntry;

/// Run `action` against a loaded entry; reports whether anything changed
pub(crate) fn apply_action(entry: &mut Option<WorkoutLogEntry>, action: WorkoutAction) -> bool {
    match entry.take() {
        Some(current) => {
            let next = reduce(current.clone(), action);
            let changed = next != current;
            *entry = Some(next);
            changed
        }
        None => false,
    }
}
