//! Implements a multi-threaded backend on top of a rayon thread pool
//!
//! Every submitted task gets spawned onto the pool right away. Workers send
//! results back over a channel, so the orchestrating thread receives them in
//! completion order and can consume each result while other tasks are still
//! running.
//!
//! The orchestrating thread may itself be a rayon worker (e.g. when the
//! calculation is launched from within `ThreadPool::install`). Blocking such a
//! worker could leave nobody to run the tasks, so it keeps executing pending
//! rayon jobs while it waits.

use crate::Error;
use crate::executor::{Executor, TaskBatch, TaskId, run_task};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::time::Duration;

// how long a worker waits for a result when it has no other job to run
const WORKER_POLL_INTERVAL: Duration = Duration::from_micros(200);

pub struct RayonBatch<R> {
    pool: Option<Arc<ThreadPool>>,
    sender: Sender<(TaskId, Result<R, Error>)>,
    receiver: Receiver<(TaskId, Result<R, Error>)>,
    n_submitted: usize,
    n_pending: usize,
}

impl<R: Send + 'static> TaskBatch<R> for RayonBatch<R> {
    fn submit<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let id = TaskId::new(self.n_submitted);
        self.n_submitted += 1;
        self.n_pending += 1;

        let sender = self.sender.clone();
        let job = move || {
            // panics are caught here. Otherwise rayon would abort the process
            let outcome = run_task(id, task);
            // the receiver only goes away when the batch is dropped, at which
            // point nobody cares about the result
            let _ = sender.send((id, outcome));
        };
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
        id
    }

    fn n_pending(&self) -> usize {
        self.n_pending
    }

    fn next_completed(&mut self) -> Option<(TaskId, Result<R, Error>)> {
        if self.n_pending == 0 {
            return None;
        }
        // we hold a sender, so receiving can only fail if a task vanished
        // without reporting back (which run_task prevents)
        let completed = if rayon::current_thread_index().is_some() {
            self.wait_on_worker()?
        } else {
            self.receiver.recv().ok()?
        };
        self.n_pending -= 1;
        Some(completed)
    }
}

impl<R> RayonBatch<R> {
    /// wait for the next result while helping out with queued rayon jobs
    fn wait_on_worker(&self) -> Option<(TaskId, Result<R, Error>)> {
        loop {
            match self.receiver.try_recv() {
                Ok(completed) => return Some(completed),
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => {}
            }
            if let Some(rayon::Yield::Executed) = rayon::yield_now() {
                continue;
            }
            // our tasks are running elsewhere (or on another pool)
            match self.receiver.recv_timeout(WORKER_POLL_INTERVAL) {
                Ok(completed) => return Some(completed),
                Err(RecvTimeoutError::Disconnected) => return None,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

/// Dispatches tasks onto a rayon thread pool
///
/// By default, tasks run on rayon's global pool.
#[derive(Clone, Default)]
pub struct RayonExecutor {
    pool: Option<Arc<ThreadPool>>,
}

impl RayonExecutor {
    /// use rayon's global thread pool
    pub fn new() -> Self {
        RayonExecutor { pool: None }
    }

    /// build a dedicated pool with `n_threads` worker threads
    pub fn with_n_threads(n_threads: usize) -> Result<Self, Error> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("mapdist-worker-{i}"))
            .build()
            .map_err(|err| Error::backend(err.to_string()))?;
        Ok(RayonExecutor {
            pool: Some(Arc::new(pool)),
        })
    }

    /// the number of worker threads that tasks are spread over
    pub fn n_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl Executor for RayonExecutor {
    type Batch<R: Send + 'static> = RayonBatch<R>;

    fn batch<R: Send + 'static>(&self) -> RayonBatch<R> {
        let (sender, receiver) = channel();
        RayonBatch {
            pool: self.pool.clone(),
            sender,
            receiver,
            n_submitted: 0,
            n_pending: 0,
        }
    }
}
