//! Fixed-size worker pool.
//!
//! Jobs go into one shared FIFO guarded by a mutex/condvar pair. Each
//! submission gets a [`TaskHandle`] backed by a oneshot channel that yields
//! the job's result, or the panic it raised.
//!
//! Shutdown drops whatever is still queued. Handles for dropped jobs resolve
//! to [`TaskError::Cancelled`] rather than blocking forever.

use std::any::Any;
use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Errors reported synchronously by the pool itself.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Task pool needs at least one worker")]
    NoWorkers,

    #[error("Task pool stopped")]
    Stopped,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Errors reported through a [`TaskHandle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task was dropped before it ran")]
    Cancelled,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    jobs: VecDeque<Job>,
    stopped: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// Pending result of a submitted job.
#[must_use = "dropping a handle discards the task's result"]
pub struct TaskHandle<T> {
    receiver: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Block until the job finishes.
    pub fn join(self) -> Result<T, TaskError> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            // Sender dropped without sending: the job never ran
            Err(_) => Err(TaskError::Cancelled),
        }
    }
}

/// Fixed-size pool of worker threads.
pub struct TaskPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    /// Spawn `workers` threads.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        });

        // Built up in place so an early return still joins the spawned workers
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(workers),
        };

        for index in 0..workers {
            let shared = pool.shared.clone();
            let handle = thread::Builder::new()
                .name(format!("prism-worker-{}", index))
                .spawn(move || worker_loop(&shared))?;
            pool.workers.push(handle);
        }

        log::debug!("Task pool started with {} workers", workers);
        Ok(pool)
    }

    /// One worker per available hardware thread.
    pub fn with_available_parallelism() -> Result<Self, PoolError> {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of jobs waiting for a worker.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().jobs.len()
    }

    /// Queue a job. Safe to call from several threads at once.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
            if sender.send(outcome).is_err() {
                log::trace!("Task handle dropped before the task finished");
            }
        });

        {
            let mut queue = self.shared.queue.lock();
            if queue.stopped {
                return Err(PoolError::Stopped);
            }
            queue.jobs.push_back(job);
        }

        self.shared.available.notify_one();
        Ok(TaskHandle { receiver })
    }

    /// Stop accepting work, drop queued jobs and join every worker.
    ///
    /// Jobs already running finish first. Calling this twice is a no-op.
    pub fn shutdown(&mut self) {
        let dropped: Vec<Job> = {
            let mut queue = self.shared.queue.lock();
            queue.stopped = true;
            queue.jobs.drain(..).collect()
        };
        self.shared.available.notify_all();

        if !dropped.is_empty() {
            log::debug!("Task pool dropped {} queued jobs on shutdown", dropped.len());
        }
        drop(dropped);

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("Task pool worker exited with a panic");
            }
        }
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if queue.stopped {
                    return;
                }
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                shared.available.wait(&mut queue);
            }
        };

        job();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
