//! Notification capability
//!
//! Notifications are fire-and-forget: the caller never learns whether the
//! platform delivered them.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::info;

pub trait Notifier: Send + Sync {
    /// The rest period counted down by a rest timer has ended
    fn rest_finished(&self);

    /// Ask the platform to remind the user at `at`
    fn schedule_reminder(&self, label: &str, at: DateTime<Utc>);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn rest_finished(&self) {
        info!("Rest finished");
    }

    fn schedule_reminder(&self, label: &str, at: DateTime<Utc>) {
        info!(label, at = %at.to_rfc3339(), "Workout reminder scheduled");
    }
}

/// A call received by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    RestFinished,
    Reminder { label: String, at: DateTime<Utc> },
}

/// Notifier that records every call, in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn rest_finished_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|n| matches!(n, Notification::RestFinished))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn rest_finished(&self) {
        self.lock().push(Notification::RestFinished);
    }

    fn schedule_reminder(&self, label: &str, at: DateTime<Utc>) {
        self.lock().push(Notification::Reminder {
            label: label.to_string(),
            at,
        });
    }
}
