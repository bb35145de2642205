//! Implements the "serial" backend
//!
//! Tasks are deferred until a result is requested, then run one at a time on
//! the calling thread in submission order. This is primarily useful for
//! testing and debugging: it produces the same output as the other backends
//! without any threads being involved.

use crate::Error;
use crate::executor::{Executor, TaskBatch, TaskId, run_task};
use std::collections::VecDeque;

type DeferredTask<R> = Box<dyn FnOnce() -> R + Send + 'static>;

pub struct SerialBatch<R> {
    pending: VecDeque<(TaskId, DeferredTask<R>)>,
    n_submitted: usize,
}

impl<R: Send + 'static> TaskBatch<R> for SerialBatch<R> {
    fn submit<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let id = TaskId::new(self.n_submitted);
        self.n_submitted += 1;
        self.pending.push_back((id, Box::new(task)));
        id
    }

    fn n_pending(&self) -> usize {
        self.pending.len()
    }

    fn next_completed(&mut self) -> Option<(TaskId, Result<R, Error>)> {
        let (id, task) = self.pending.pop_front()?;
        Some((id, run_task(id, task)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    type Batch<R: Send + 'static> = SerialBatch<R>;

    fn batch<R: Send + 'static>(&self) -> SerialBatch<R> {
        SerialBatch {
            pending: VecDeque::new(),
            n_submitted: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_runs_in_submission_order() {
        let executor = SerialExecutor;
        let shared = executor.broadcast(vec![10, 20, 30]);
        let mut batch = executor.batch::<i32>();
        for i in 0..3 {
            let shared = shared.clone();
            batch.submit(move || shared[i] + 1);
        }
        assert_eq!(batch.n_pending(), 3);
        let results: Vec<(usize, i32)> = batch
            .as_completed()
            .map(|(id, result)| (id.get(), result.unwrap()))
            .collect();
        assert_eq!(results, vec![(0, 11), (1, 21), (2, 31)]);
    }

    #[test]
    fn serial_reports_panics() {
        let executor = SerialExecutor;
        let mut batch = executor.batch::<u8>();
        batch.submit(|| 1);
        batch.submit(|| panic!("boom"));
        let (_, first) = batch.next_completed().unwrap();
        assert_eq!(first.unwrap(), 1);
        let (id, second) = batch.next_completed().unwrap();
        assert_eq!(id.get(), 1);
        let err = second.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(batch.next_completed().is_none());
    }
}
