//! Inline policy: every job runs synchronously on the caller's stack.
//!
//! `defer_execute` also runs immediately. Deferring from inside an inline
//! step therefore recurses into the same step right away; a step that keeps
//! deferring on an inline channel never returns.

use tracing::trace;

use super::{Executor, ExecutorPolicy, ExecutorStats, Job};
use crate::config::ExecutorConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl InlineExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for InlineExecutor {
    fn with_config(_config: &ExecutorConfig) -> Self {
        Self
    }

    fn policy(&self) -> ExecutorPolicy {
        ExecutorPolicy::Inline
    }

    fn execute(&self, job: Job) {
        job();
    }

    fn bulk_execute(&self, jobs: Vec<Job>) {
        trace!(count = jobs.len(), "Inline bulk execution");
        for job in jobs {
            job();
        }
    }

    fn defer_execute(&self, job: Job) {
        job();
    }

    fn dispatch(&self) {}

    fn stats(&self) -> ExecutorStats {
        ExecutorStats {
            policy: ExecutorPolicy::Inline,
            pending: 0,
            deferred: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_runs_in_stack_and_in_order() {
        let executor = InlineExecutor::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&log);
        executor.execute(Box::new(move || first.lock().push("execute")));
        assert_eq!(*log.lock(), vec!["execute"]);

        let jobs: Vec<Job> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let log = Arc::clone(&log);
                Box::new(move || log.lock().push(name)) as Job
            })
            .collect();
        executor.bulk_execute(jobs);

        let deferred = Arc::clone(&log);
        executor.defer_execute(Box::new(move || deferred.lock().push("deferred")));

        assert_eq!(*log.lock(), vec!["execute", "a", "b", "c", "deferred"]);
        assert_eq!(executor.stats().pending, 0);
    }
}
