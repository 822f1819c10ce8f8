//! Structured fan-out over child entities
//!
//! Children run concurrently up to a limit, and the parent only completes
//! once every child has finished.

use std::future::Future;

use futures::stream::{self, StreamExt};

use super::report::Outcome;

/// Run `task` for every item, at most `limit` at a time
///
/// Results come back in input order.
pub(crate) async fn fan_out<T, R, F, Fut>(
    items: impl IntoIterator<Item = T>,
    limit: usize,
    task: F,
) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(task)
        .buffered(limit.max(1))
        .collect()
        .await
}

/// Run `task` for every item and merge the child outcomes
pub(crate) async fn gather<T, F, Fut>(
    items: impl IntoIterator<Item = T>,
    limit: usize,
    task: F,
) -> Outcome
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Outcome>,
{
    fan_out(items, limit, task)
        .await
        .into_iter()
        .fold(Outcome::default(), |mut acc, child| {
            acc.merge(child);
            acc
        })
}
