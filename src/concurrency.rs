//! Bounded concurrency worker pool
//!
//! Runs an async task per item with at most `worker_limit` tasks in flight. Workers claim
//! indices from a shared atomic cursor and write into the matching output slot, so results
//! come back in input order no matter which task finishes first.

use futures::future::join_all;
use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Default cap on concurrent outbound document fetches.
pub const DEFAULT_WORKER_LIMIT: usize = 12;

/// Run `task(item, index)` for every item with at most `worker_limit` running at once.
///
/// The result vector is aligned with `items`. A task that returns `Err` or panics leaves
/// `None` in its slot and does not affect the others. A `worker_limit` of zero runs one
/// worker. Returns once every worker has drained the cursor.
pub async fn fetch_all<T, R, E, F, Fut>(items: Vec<T>, worker_limit: usize, task: F) -> Vec<Option<R>>
where
    T: Clone,
    E: Display,
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let total = items.len();
    let worker_count = worker_limit.max(1).min(total);
    let cursor = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<R>>> = Mutex::new((0..total).map(|_| None).collect());

    let items = &items;
    let task = &task;
    let cursor = &cursor;
    let slots_ref = &slots;

    let workers = (0..worker_count).map(|worker_id| async move {
        loop {
            let index = cursor.fetch_add(1, Ordering::SeqCst);
            if index >= total {
                break;
            }

            let outcome = AssertUnwindSafe(task(items[index].clone(), index))
                .catch_unwind()
                .await;
            let value = match outcome {
                Ok(Ok(value)) => Some(value),
                Ok(Err(e)) => {
                    warn!(worker_id, index, error = %e, "Task failed");
                    None
                }
                Err(_) => {
                    warn!(worker_id, index, "Task panicked");
                    None
                }
            };
            slots_ref.lock()[index] = value;
        }
    });

    join_all(workers).await;
    slots.into_inner()
}
