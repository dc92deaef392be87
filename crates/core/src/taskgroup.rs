//! Bounded, fail-fast task group
//!
//! Futures are queued with [`TaskGroup::spawn`] and driven by
//! [`TaskGroup::wait`] with at most `limit` of them in flight. The first
//! error is returned immediately; every future that is still queued or
//! running is dropped, which cancels it.
//!
//! Tasks may borrow from the caller for `'a`, so a task can hold `&mut` to
//! the one slot it fills without any shared index or lock.

use std::future::Future;

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};

pub struct TaskGroup<'a, E> {
    limit: usize,
    tasks: Vec<BoxFuture<'a, Result<(), E>>>,
}

impl<'a, E: Send + 'a> TaskGroup<'a, E> {
    /// Create a group running at most `limit` tasks at once (minimum 1)
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            tasks: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Queue a task; it does not start until [`wait`](Self::wait) polls it
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'a,
    {
        self.tasks.push(task.boxed());
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task, returning the first error observed
    pub async fn wait(self) -> Result<(), E> {
        let mut running = stream::iter(self.tasks).buffer_unordered(self.limit);
        while let Some(result) = running.next().await {
            result?;
        }
        Ok(())
    }
}
