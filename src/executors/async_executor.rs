//! # Async Policy
//!
//! Every job gets its own named thread immediately. Dispatch never blocks and
//! is only needed to reap the join handles of threads that have finished.
//! A job that panics takes down only its own thread.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{error, trace};

use super::{Executor, ExecutorPolicy, ExecutorStats, Job};
use crate::config::{AsyncConfig, ExecutorConfig};

pub struct AsyncExecutor {
    handles: Mutex<Vec<JoinHandle<()>>>,
    thread_name_prefix: String,
    stack_size: Option<usize>,
    spawned: AtomicU64,
}

impl AsyncExecutor {
    pub fn new(config: &AsyncConfig) -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
            thread_name_prefix: config.thread_name_prefix.clone(),
            stack_size: config.stack_size,
            spawned: AtomicU64::new(0),
        }
    }

    /// Threads started since creation
    pub fn spawned_count(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }

    fn spawn(&self, job: Job) {
        let sequence = self.spawned.fetch_add(1, Ordering::Relaxed);
        let mut builder =
            thread::Builder::new().name(format!("{}-{sequence}", self.thread_name_prefix));
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }

        match builder.spawn(job) {
            Ok(handle) => self.handles.lock().push(handle),
            Err(e) => error!(
                error = %e,
                thread_name_prefix = %self.thread_name_prefix,
                "❌ ASYNC: Failed to spawn worker thread, job dropped"
            ),
        }
    }
}

impl Executor for AsyncExecutor {
    fn with_config(config: &ExecutorConfig) -> Self {
        Self::new(&config.async_threads)
    }

    fn policy(&self) -> ExecutorPolicy {
        ExecutorPolicy::Async
    }

    fn execute(&self, job: Job) {
        self.spawn(job);
    }

    fn bulk_execute(&self, jobs: Vec<Job>) {
        for job in jobs {
            self.spawn(job);
        }
    }

    fn defer_execute(&self, job: Job) {
        self.spawn(job);
    }

    fn dispatch(&self) {
        let finished: Vec<JoinHandle<()>> = {
            let mut handles = self.handles.lock();
            let mut finished = Vec::new();
            let mut index = 0;
            while index < handles.len() {
                if handles[index].is_finished() {
                    finished.push(handles.swap_remove(index));
                } else {
                    index += 1;
                }
            }
            finished
        };

        trace!(reaped = finished.len(), "Async dispatch");

        // Already finished, so joining returns at once. A panicked job's
        // payload is discarded here; its future handle reports abandonment.
        for handle in finished {
            let _ = handle.join();
        }
    }

    fn stats(&self) -> ExecutorStats {
        ExecutorStats {
            policy: ExecutorPolicy::Async,
            pending: self.handles.lock().len(),
            deferred: 0,
        }
    }
}

impl std::fmt::Debug for AsyncExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncExecutor")
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("stack_size", &self.stack_size)
            .field("spawned", &self.spawned_count())
            .finish()
    }
}
