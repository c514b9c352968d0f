//! Rest timer between sets
//!
//! A one-second countdown running on the tokio runtime. State is published on
//! a watch channel so a screen can render it without polling. When the count
//! reaches zero the timer stops and the notifier's rest-finished notification
//! fires exactly once.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::notify::Notifier;
use crate::{GymlogError, Result};

const TICK: Duration = Duration::from_secs(1);

/// Presets offered next to the countdown
pub const REST_PRESETS: [u32; 3] = [30, 60, 90];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTimerState {
    /// Seconds left in the current rest period
    pub remaining: u32,
    /// Length of a full rest period
    pub total: u32,
    pub running: bool,
}

struct Shared {
    state: watch::Sender<RestTimerState>,
    notifier: Arc<dyn Notifier>,
}

impl Shared {
    /// Stop at zero; true if this call is the one that finished the period
    fn finish_if_elapsed(state: &mut RestTimerState) -> bool {
        if state.running && state.remaining == 0 {
            state.running = false;
            return true;
        }
        false
    }
}

pub struct RestTimer {
    shared: Arc<Shared>,
    step: u32,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl RestTimer {
    /// A stopped timer holding a full period of `total` seconds
    ///
    /// `step` is the adjustment applied by [`add_time`](Self::add_time) and
    /// [`subtract_time`](Self::subtract_time).
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is zero.
    pub fn new(total: u32, step: u32, notifier: Arc<dyn Notifier>) -> Result<Self> {
        validate_total(total)?;
        Ok(Self {
            shared: Arc::new(Shared {
                state: watch::Sender::new(RestTimerState {
                    remaining: total,
                    total,
                    running: false,
                }),
                notifier,
            }),
            step,
            ticker: Mutex::new(None),
        })
    }

    pub fn state(&self) -> RestTimerState {
        *self.shared.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RestTimerState> {
        self.shared.state.subscribe()
    }

    /// Start counting down; from zero the count restarts at the total
    ///
    /// Must be called within a tokio runtime. No-op while running.
    pub fn start(&self) {
        let started = self.shared.state.send_if_modified(|s| {
            if s.running {
                return false;
            }
            if s.remaining == 0 {
                s.remaining = s.total;
            }
            s.running = true;
            true
        });

        if started {
            debug!(remaining = self.state().remaining, "Rest timer started");
            let shared = Arc::clone(&self.shared);
            self.replace_ticker(Some(tokio::spawn(tick(shared))));
        }
    }

    pub fn pause(&self) {
        self.replace_ticker(None);
        self.shared.state.send_if_modified(|s| {
            let was_running = s.running;
            s.running = false;
            was_running
        });
    }

    /// Continue after [`pause`](Self::pause)
    pub fn resume(&self) {
        self.start();
    }

    /// Stop and refill to the total
    pub fn reset(&self) {
        self.replace_ticker(None);
        self.shared.state.send_modify(|s| {
            s.remaining = s.total;
            s.running = false;
        });
    }

    /// Add one step; ignored while stopped
    pub fn add_time(&self) {
        let step = self.step;
        self.shared.state.send_if_modified(|s| {
            if !s.running {
                return false;
            }
            s.remaining = s.remaining.saturating_add(step);
            true
        });
    }

    /// Remove one step, flooring at zero; ignored while stopped
    ///
    /// Reaching zero this way finishes the rest period immediately.
    pub fn subtract_time(&self) {
        let step = self.step;
        let mut finished = false;
        self.shared.state.send_if_modified(|s| {
            if !s.running {
                return false;
            }
            s.remaining = s.remaining.saturating_sub(step);
            finished = Shared::finish_if_elapsed(s);
            true
        });

        if finished {
            self.replace_ticker(None);
            self.shared.notifier.rest_finished();
        }
    }

    /// Change the period length; ignored while running
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is zero.
    pub fn set_total(&self, total: u32) -> Result<()> {
        validate_total(total)?;
        self.shared.state.send_if_modified(|s| {
            if s.running || s.total == total {
                return false;
            }
            s.total = total;
            true
        });
        Ok(())
    }

    fn ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn replace_ticker(&self, next: Option<JoinHandle<()>>) {
        let mut ticker = self.ticker();
        if let Some(previous) = ticker.take() {
            previous.abort();
        }
        *ticker = next;
    }
}

impl Drop for RestTimer {
    fn drop(&mut self) {
        self.replace_ticker(None);
    }
}

fn validate_total(total: u32) -> Result<()> {
    if total == 0 {
        return Err(GymlogError::InvalidInput(
            "Rest period must be at least one second".to_string(),
        ));
    }
    Ok(())
}

async fn tick(shared: Arc<Shared>) {
    loop {
        tokio::time::sleep(TICK).await;

        let mut running = false;
        let mut finished = false;
        shared.state.send_if_modified(|s| {
            if !s.running {
                return false;
            }
            s.remaining = s.remaining.saturating_sub(1);
            finished = Shared::finish_if_elapsed(s);
            running = s.running;
            true
        });

        if finished {
            debug!("Rest timer finished");
            shared.notifier.rest_finished();
        }
        if !running {
            return;
        }
    }
}
