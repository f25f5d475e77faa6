//! # Strand Policy
//!
//! Ordered buffer swapped out whole on each dispatch. Everything queued before
//! a dispatch runs together in insertion order; jobs queued while that batch
//! runs wait for the next dispatch.

use parking_lot::Mutex;
use std::mem;
use tracing::trace;

use super::{Executor, ExecutorPolicy, ExecutorStats, Job};
use crate::config::ExecutorConfig;

pub struct StrandExecutor {
    jobs: Mutex<Vec<Job>>,
    capacity: usize,
}

impl StrandExecutor {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }
}

impl Executor for StrandExecutor {
    fn with_config(config: &ExecutorConfig) -> Self {
        Self::new(config.strand_capacity)
    }

    fn policy(&self) -> ExecutorPolicy {
        ExecutorPolicy::Strand
    }

    fn execute(&self, job: Job) {
        self.jobs.lock().push(job);
    }

    fn bulk_execute(&self, jobs: Vec<Job>) {
        self.jobs.lock().extend(jobs);
    }

    fn defer_execute(&self, job: Job) {
        self.execute(job);
    }

    fn dispatch(&self) {
        let batch = mem::replace(&mut *self.jobs.lock(), Vec::with_capacity(self.capacity));
        trace!(count = batch.len(), "Strand dispatch");

        for job in batch {
            job();
        }
    }

    fn stats(&self) -> ExecutorStats {
        ExecutorStats {
            policy: ExecutorPolicy::Strand,
            pending: self.jobs.lock().len(),
            deferred: 0,
        }
    }
}

impl std::fmt::Debug for StrandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrandExecutor")
            .field("pending", &self.stats().pending)
            .finish()
    }
}
