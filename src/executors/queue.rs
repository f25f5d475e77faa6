//! # Queue Policy
//!
//! FIFO of pending jobs drained by [`Executor::dispatch`]. Deferred jobs sit in
//! a second FIFO that is only promoted once the main FIFO has been drained, so
//! a deferred job always waits for at least one full dispatch cycle.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::trace;

use super::{Executor, ExecutorPolicy, ExecutorStats, Job};
use crate::config::ExecutorConfig;

pub struct QueueExecutor {
    jobs: Mutex<VecDeque<Job>>,
    deferred: Mutex<VecDeque<Job>>,
}

impl QueueExecutor {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(VecDeque::with_capacity(capacity)),
            deferred: Mutex::new(VecDeque::new()),
        }
    }
}

impl Executor for QueueExecutor {
    fn with_config(config: &ExecutorConfig) -> Self {
        Self::new(config.queue_capacity)
    }

    fn policy(&self) -> ExecutorPolicy {
        ExecutorPolicy::Queue
    }

    fn execute(&self, job: Job) {
        self.jobs.lock().push_back(job);
    }

    fn bulk_execute(&self, jobs: Vec<Job>) {
        self.jobs.lock().extend(jobs);
    }

    fn defer_execute(&self, job: Job) {
        self.deferred.lock().push_back(job);
    }

    fn dispatch(&self) {
        let mut ran = 0usize;

        // The lock is released before each job runs so jobs may re-post here.
        loop {
            let job = self.jobs.lock().pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => break,
            }
        }

        let mut deferred = self.deferred.lock();
        let promoted = deferred.len();
        if promoted > 0 {
            self.jobs.lock().extend(deferred.drain(..));
        }
        drop(deferred);

        trace!(ran, promoted, "Queue dispatch complete");
    }

    fn stats(&self) -> ExecutorStats {
        ExecutorStats {
            policy: ExecutorPolicy::Queue,
            pending: self.jobs.lock().len(),
            deferred: self.deferred.lock().len(),
        }
    }
}

impl std::fmt::Debug for QueueExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("QueueExecutor")
            .field("pending", &stats.pending)
            .field("deferred", &stats.deferred)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_job(counter: &Arc<AtomicUsize>) -> Job {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_nothing_runs_before_dispatch() {
        let executor = QueueExecutor::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        executor.execute(counting_job(&counter));
        executor.bulk_execute(vec![counting_job(&counter), counting_job(&counter)]);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(executor.stats().pending, 3);

        executor.dispatch();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(executor.stats().pending, 0);
    }

    #[test]
    fn test_deferred_job_waits_one_cycle() {
        let executor = QueueExecutor::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        executor.defer_execute(counting_job(&counter));
        assert_eq!(executor.stats().deferred, 1);

        executor.dispatch();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(executor.stats().pending, 1);
        assert_eq!(executor.stats().deferred, 0);

        executor.dispatch();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_jobs_posted_during_dispatch_run_in_same_pass() {
        let executor = Arc::new(QueueExecutor::new(4));
        let counter = Arc::new(AtomicUsize::new(0));

        let inner_executor = Arc::clone(&executor);
        let inner_counter = Arc::clone(&counter);
        executor.execute(Box::new(move || {
            inner_executor.execute(counting_job(&inner_counter));
        }));

        executor.dispatch();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
