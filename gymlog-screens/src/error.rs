//! Error types for gymlog-screens
//!
//! Wraps service layer errors and adds the few failures that only make sense
//! at the screen level.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libgymlog::GymlogError),

    /// An action needs data the screen has not loaded
    #[error("{0} is not loaded")]
    NotLoaded(String),

    /// The user turned notifications off
    #[error("Notifications are disabled")]
    NotificationsDisabled,

    /// Input rejected before reaching the service layer
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for screen operations
pub type Result<T> = std::result::Result<T, ScreenError>;
