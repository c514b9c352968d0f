//! Helpers shared by the screen integration tests

use std::sync::Arc;
use std::time::Duration;

use gymlog_screens::{Screen, ScreenContext};
use libgymlog::notify::RecordingNotifier;
use libgymlog::ScreenTimings;

/// Context over the built-in catalog with no artificial delays
pub fn immediate_context() -> (ScreenContext, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let context = ScreenContext::in_memory(ScreenTimings::immediate()).with_notifier(notifier.clone());
    (context, notifier)
}

/// Wait (in virtual time) until the screen publishes a state matching `predicate`
pub async fn wait_until<S, F>(screen: &S, mut predicate: F) -> S::State
where
    S: Screen,
    F: FnMut(&S::State) -> bool,
{
    let mut rx = screen.subscribe();
    let matched = tokio::time::timeout(Duration::from_secs(120), rx.wait_for(|s| predicate(s)))
        .await
        .expect("screen never reached the expected state")
        .expect("screen state channel closed");
    (*matched).clone()
}
