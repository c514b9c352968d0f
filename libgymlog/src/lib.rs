//! GymLog - workout logging core
//!
//! This library holds the state and rules of the GymLog fitness app: the
//! reactive workout repository, derived views, workout session editing, the
//! rest timer and the auth, preference and notification capabilities.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod notify;
pub mod preferences;
pub mod repository;
pub mod scheduling;
pub mod service;
pub mod session;
pub mod timer;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use config::{Config, ScreenTimings};
pub use error::{GymlogError, Result};
pub use repository::{InMemoryWorkoutRepository, MissingLogPolicy, WorkoutRepository};
pub use types::{
    Exercise, Faq, PerformedExercise, PerformedSet, ProfileData, UserSettings, WorkoutLogEntry,
    WorkoutRoutine,
};
pub use views::Observable;
