//! Bounded worker-thread pool for dispatching blocking calls off the
//! scheduler thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::runtime::Handle;
use tracing::debug;

use crate::bridge::{BridgedFuture, pair};
use crate::error::SqlBridgeError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A bounded pool of named OS threads that run blocking closures.
///
/// The scheduler handle is injected at construction; each worker enters it
/// so submitted closures can reach the runtime if they need to. Submission
/// returns a [`BridgedFuture`] resolved from the worker thread through the
/// same completion path driver handles use.
#[derive(Debug)]
pub struct WorkerPool {
    sender: Mutex<Option<Sender<Job>>>,
    size: usize,
}

impl WorkerPool {
    /// Spawn a pool of `size` worker threads bound to the given scheduler.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero-sized pool and `ConnectionError` if
    /// a worker thread cannot be spawned.
    pub fn new(size: usize, scheduler: Handle) -> Result<Self, SqlBridgeError> {
        if size == 0 {
            return Err(SqlBridgeError::ConfigError(
                "worker pool requires at least one thread".into(),
            ));
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        for index in 0..size {
            let receiver = Arc::clone(&receiver);
            let handle = scheduler.clone();
            thread::Builder::new()
                .name(format!("bridge-worker-{index}"))
                .spawn(move || {
                    let runtime_guard = handle.enter();
                    run_worker(&receiver);
                    drop(runtime_guard);
                })
                .map_err(|err| {
                    SqlBridgeError::ConnectionError(format!(
                        "failed to spawn bridge worker thread: {err}"
                    ))
                })?;
        }

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            size,
        })
    }

    /// Submit a blocking closure; the returned future resolves with the
    /// closure's result.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` synchronously if the pool has been shut
    /// down. The closure's own failure is delivered through the future.
    pub fn submit<T, F>(&self, job: F) -> Result<BridgedFuture<T>, SqlBridgeError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, SqlBridgeError> + Send + 'static,
    {
        let (completion, future) = pair();
        self.send(Box::new(move || completion.resolve(job())))?;
        Ok(future)
    }

    /// Run a closure for its side effect only.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` if the pool has been shut down.
    pub fn spawn_detached<F>(&self, job: F) -> Result<(), SqlBridgeError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.send(Box::new(job))
    }

    /// The number of worker threads.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Close the queue. Jobs already queued still run; later submissions
    /// fail synchronously.
    pub fn shutdown(&self) {
        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if sender.is_some() {
            debug!("worker pool shut down");
        }
    }

    fn send(&self, job: Job) -> Result<(), SqlBridgeError> {
        let guard = match self.sender.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .as_ref()
            .ok_or_else(|| SqlBridgeError::SubmissionError("worker pool is shut down".into()))?
            .send(job)
            .map_err(|_| SqlBridgeError::SubmissionError("worker pool is shut down".into()))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: &Arc<Mutex<Receiver<Job>>>) {
    loop {
        let job = {
            let guard = match receiver.lock() {
                Ok(guard) => guard,
                Err(_) => break,
            };
            guard.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}
