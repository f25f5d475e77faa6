//! # Executor Policies
//!
//! Four interchangeable scheduling policies behind one object-safe
//! [`Executor`] trait:
//!
//! | Policy | `execute` | `defer_execute` | `dispatch` |
//! |---|---|---|---|
//! | [`InlineExecutor`] | runs now, in-stack | runs now | no-op |
//! | [`QueueExecutor`] | FIFO append | separate deferred FIFO | drains FIFO, then promotes deferred |
//! | [`AsyncExecutor`] | new thread now | same as `execute` | reaps finished threads |
//! | [`StrandExecutor`] | buffer append | same as `execute` | swaps buffer out, runs it in order |
//!
//! Two-way execution (`future_execute`, `future_bulk_execute`) is provided
//! once for every policy by [`ExecutorExt`]: the callable is wrapped with a
//! promise and sent down the policy's own `execute` / `bulk_execute` path.

pub mod async_executor;
pub mod future;
pub mod inline;
pub mod queue;
pub mod strand;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ExecutorConfig;

pub use async_executor::AsyncExecutor;
pub use future::{promise, Promise, TaskFuture};
pub use inline::InlineExecutor;
pub use queue::QueueExecutor;
pub use strand::StrandExecutor;

/// One-way unit of work handed to an executor
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Scheduling policy of an executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorPolicy {
    Inline,
    Queue,
    Async,
    Strand,
}

impl ExecutorPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutorPolicy::Inline => "inline",
            ExecutorPolicy::Queue => "queue",
            ExecutorPolicy::Async => "async",
            ExecutorPolicy::Strand => "strand",
        }
    }

    /// Whether posted work only advances when the channel is dispatched
    pub fn requires_dispatch(&self) -> bool {
        matches!(self, ExecutorPolicy::Queue | ExecutorPolicy::Strand)
    }
}

impl fmt::Display for ExecutorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point-in-time view of an executor's pending work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorStats {
    pub policy: ExecutorPolicy,
    /// Jobs waiting for dispatch (queue, strand) or unreaped threads (async)
    pub pending: usize,
    /// Jobs held back until the next dispatch cycle (queue only)
    pub deferred: usize,
}

/// Scheduling capability set shared by every policy
pub trait Executor: Send + Sync + 'static {
    /// Build an instance; called once per channel by the dispatcher registry
    fn with_config(config: &ExecutorConfig) -> Self
    where
        Self: Sized;

    fn policy(&self) -> ExecutorPolicy;

    /// One-way execution
    fn execute(&self, job: Job);

    /// One-way execution of a group, enqueued in argument order
    fn bulk_execute(&self, jobs: Vec<Job>);

    /// One-way execution no earlier than the policy's next opportunity
    fn defer_execute(&self, job: Job);

    /// Advance pending work
    fn dispatch(&self);

    fn stats(&self) -> ExecutorStats;
}

/// Two-way execution for every [`Executor`], including `dyn Executor`
pub trait ExecutorExt: Executor {
    /// Execute `callable` and receive a handle to its result
    fn future_execute<R, F>(&self, callable: F) -> TaskFuture<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (promise, future) = promise();
        self.execute(Box::new(move || promise.set(callable())));
        future
    }

    /// Execute a group and receive one handle per callable, in argument order
    fn future_bulk_execute<R, F, I>(&self, callables: I) -> Vec<TaskFuture<R>>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
        I: IntoIterator<Item = F>,
    {
        let mut futures = Vec::new();
        let jobs = callables
            .into_iter()
            .map(|callable| {
                let (promise, future) = promise();
                futures.push(future);
                Box::new(move || promise.set(callable())) as Job
            })
            .collect();

        self.bulk_execute(jobs);
        futures
    }
}

impl<E: Executor + ?Sized> ExecutorExt for E {}
