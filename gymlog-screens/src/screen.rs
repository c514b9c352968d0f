//! State-holder plumbing
//!
//! Every screen publishes an immutable UI state on a watch channel and owns
//! the tasks that feed it. Dropping the screen aborts those tasks.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A presentation state holder
pub trait Screen {
    type State: Clone;

    /// Receiver holding the current state and every later one
    fn subscribe(&self) -> watch::Receiver<Self::State>;

    /// Snapshot of the current state
    fn state(&self) -> Self::State {
        self.subscribe().borrow().clone()
    }
}

/// Tasks owned by one screen
#[derive(Default)]
pub(crate) struct TaskSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Spawn onto the current runtime; finished handles are pruned on the way
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut handles = self.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        for handle in self.lock().drain(..) {
            handle.abort();
        }
    }
}

/// At most one task; spawning another aborts the previous one
#[derive(Default)]
pub(crate) struct TaskSlot {
    current: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replace<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let next = tokio::spawn(task);
        if let Some(previous) = self.lock().replace(next) {
            previous.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }
}

/// `"Failed to <action>: <error>"`, the wording used for every load failure
pub(crate) fn failure(action: &str, error: impl std::fmt::Display) -> String {
    format!("Failed to {}: {}", action, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_dropping_task_set_aborts_tasks() {
        let reached = Arc::new(AtomicBool::new(false));
        let tasks = TaskSet::new();

        let flag = Arc::clone(&reached);
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(tasks);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_slot_keeps_only_latest() {
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = TaskSlot::new();

        for _ in 0..2 {
            let counter = Arc::clone(&fired);
            slot.replace(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(600)).await;
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_wording() {
        assert_eq!(
            failure("load routines", "boom"),
            "Failed to load routines: boom"
        );
    }
}
