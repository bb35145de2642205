//! The minimal interface we require from a parallel execution backend
//!
//! The orchestrating code never assumes anything about whether tasks run on
//! threads, in other processes or lazily on the calling thread. It only
//! relies upon 3 capabilities:
//! 1. broadcasting a read-only value once so that every task can share it
//!    (see [`Executor::broadcast`])
//! 2. submitting closures (see [`TaskBatch::submit`])
//! 3. retrieving results in the order that tasks finish, one at a time, so
//!    that results can be consumed while other tasks are in flight (see
//!    [`TaskBatch::next_completed`] and [`TaskBatch::as_completed`])
//!
//! Tasks receive their inputs by value (or through a broadcast handle), and
//! hand their outputs back through the batch. They never mutate shared state,
//! so abandoning an in-flight task has no side effects.

use crate::Error;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// identifies a task within a single [`TaskBatch`]
///
/// Ids are assigned in submission order, starting from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(id: usize) -> Self {
        TaskId(id)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// a trait for describing a parallelism "backend"
///
/// The idea is that we implement this for each backend, so we have a uniform
/// interface for easily switching between them.
pub trait Executor {
    type Batch<R: Send + 'static>: TaskBatch<R>;

    /// open a new batch of tasks that produce values of type `R`
    fn batch<R: Send + 'static>(&self) -> Self::Batch<R>;

    /// Share a read-only value with every task.
    ///
    /// Tasks should clone the returned handle rather than the value itself.
    fn broadcast<T: Send + Sync + 'static>(&self, value: T) -> Arc<T> {
        Arc::new(value)
    }
}

/// A collection of submitted tasks whose results can be retrieved as they
/// complete.
pub trait TaskBatch<R: Send + 'static> {
    /// submit a task for execution
    fn submit<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static;

    /// the number of submitted tasks whose results haven't been retrieved
    fn n_pending(&self) -> usize;

    /// Wait for the next task to complete and return its result.
    ///
    /// Results come back in completion order (which need not coincide with
    /// submission order). An `Err` is returned for a task that didn't run to
    /// completion. Returns `None` once every result has been retrieved.
    fn next_completed(&mut self) -> Option<(TaskId, Result<R, Error>)>;

    /// consume the batch and lazily iterate over results as tasks complete
    fn as_completed(self) -> AsCompleted<Self, R>
    where
        Self: Sized,
    {
        AsCompleted {
            batch: self,
            _result: PhantomData,
        }
    }
}

/// Iterator returned by [`TaskBatch::as_completed`]
pub struct AsCompleted<B, R> {
    batch: B,
    _result: PhantomData<fn() -> R>,
}

impl<B: TaskBatch<R>, R: Send + 'static> Iterator for AsCompleted<B, R> {
    type Item = (TaskId, Result<R, Error>);

    fn next(&mut self) -> Option<Self::Item> {
        self.batch.next_completed()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.batch.n_pending();
        (n, Some(n))
    }
}

/// Run `task`, converting a panic into an [`Error`]
pub(crate) fn run_task<R>(id: TaskId, task: impl FnOnce() -> R) -> Result<R, Error> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(task))
        .map_err(|payload| Error::task_failed(id.get(), panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("the task panicked")
    }
}
