//! Derived-view composition
//!
//! Repository reads are exposed as [`Observable`] streams: the current
//! snapshot first, then one item per later publication. This module holds the
//! plumbing that turns a `watch` channel into such a stream, the
//! `combine_latest` combinators used to merge independent sources, and the
//! pure projections (favorite flag, search filter) applied on every emission.

use std::collections::BTreeSet;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

use crate::error::{GymlogError, Result};
use crate::types::{Exercise, RoutineId, WorkoutRoutine};

/// Live, restartable sequence of snapshots
pub type Observable<T> = BoxStream<'static, Result<T>>;

/// Adapt a watch receiver into an [`Observable`]
///
/// The first item is the value current at subscription time. The stream ends
/// when the sending side is dropped.
pub fn watch_stream<T>(mut rx: watch::Receiver<T>) -> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    let first = rx.borrow_and_update().clone();
    let rest = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let value = rx.borrow_and_update().clone();
        Some((Ok(value), rx))
    });

    stream::once(async move { Ok(first) }).chain(rest).boxed()
}

/// Take the current snapshot of a view and drop the subscription
///
/// # Errors
///
/// Returns the source's error, or `InvalidInput` if the view ended without
/// emitting.
pub async fn current<T>(mut view: Observable<T>) -> Result<T> {
    view.next().await.unwrap_or_else(|| {
        Err(GymlogError::InvalidInput(
            "View closed before emitting a snapshot".to_string(),
        ))
    })
}

/// Apply a projection to every snapshot of a source
pub fn map_view<S, T, F>(source: Observable<S>, project: F) -> Observable<T>
where
    S: Send + 'static,
    T: Send + 'static,
    F: Fn(S) -> T + Send + 'static,
{
    source.map(move |item| item.map(&project)).boxed()
}

enum Side<A, B> {
    Left(A),
    Right(B),
}

/// Merge two sources, emitting the latest pair
///
/// Nothing is emitted until both sources have produced a value; afterwards
/// every emission of either side produces a new pair. Errors from either
/// source are forwarded without touching the retained values.
pub fn combine_latest<A, B>(a: Observable<A>, b: Observable<B>) -> Observable<(A, B)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    let left = a.map(|item| item.map(Side::Left));
    let right = b.map(|item| item.map(Side::Right));
    let merged = stream::select(left, right);

    stream::unfold(
        (merged, None::<A>, None::<B>),
        |(mut merged, mut latest_a, mut latest_b)| async move {
            loop {
                match merged.next().await? {
                    Err(e) => return Some((Err(e), (merged, latest_a, latest_b))),
                    Ok(Side::Left(value)) => latest_a = Some(value),
                    Ok(Side::Right(value)) => latest_b = Some(value),
                }

                if let (Some(x), Some(y)) = (&latest_a, &latest_b) {
                    let pair = (x.clone(), y.clone());
                    return Some((Ok(pair), (merged, latest_a, latest_b)));
                }
            }
        },
    )
    .boxed()
}

/// Three-way [`combine_latest`]
pub fn combine_latest3<A, B, C>(
    a: Observable<A>,
    b: Observable<B>,
    c: Observable<C>,
) -> Observable<(A, B, C)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
{
    map_view(combine_latest(combine_latest(a, b), c), |((a, b), c)| {
        (a, b, c)
    })
}

/// Recompute `is_favorite` from the authoritative favorite set
///
/// Catalog order is preserved; no sorting happens here.
pub fn project_favorites(
    routines: &[WorkoutRoutine],
    favorites: &BTreeSet<RoutineId>,
) -> Vec<WorkoutRoutine> {
    routines
        .iter()
        .map(|routine| WorkoutRoutine {
            is_favorite: favorites.contains(&routine.id),
            ..routine.clone()
        })
        .collect()
}

/// What a blank query means for a given screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankQuery {
    /// Show the whole list (home screen)
    MatchAll,
    /// Show nothing (dedicated search screen)
    MatchNone,
}

pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Filter routines by a case-insensitive substring query
pub fn search_routines(
    routines: &[WorkoutRoutine],
    query: &str,
    blank: BlankQuery,
) -> Vec<WorkoutRoutine> {
    if is_blank(query) {
        return match blank {
            BlankQuery::MatchAll => routines.to_vec(),
            BlankQuery::MatchNone => Vec::new(),
        };
    }

    routines
        .iter()
        .filter(|routine| routine.matches(query))
        .cloned()
        .collect()
}

/// Filter exercises by name for the exercise picker; empty matches all
pub fn search_exercises(exercises: &[Exercise], query: &str) -> Vec<Exercise> {
    let needle = query.to_lowercase();
    exercises
        .iter()
        .filter(|exercise| exercise.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
