//! # Task Chains
//!
//! Fluent composition of steps into chains that hop across channels.
//!
//! - `then` feeds the current result into the next unit
//! - `post` / `post_bulk` run side units whose results are discarded
//! - any built [`Task`] nests wherever a step is accepted
//! - `submit` starts an execution; the chain itself is never consumed
//!
//! Every step, wherever it sits in the chain, may cancel the rest of the
//! execution or defer itself to a later dispatch of the channel it runs on
//! through an [`ExecutionContext`](crate::ExecutionContext).
//!
//! ```rust
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//! use tasker_chain::{task, Dispatcher, Step};
//!
//! let dispatcher = Dispatcher::new();
//! let observed = Arc::new(AtomicI32::new(0));
//! let sink = Arc::clone(&observed);
//!
//! task(Step::new(|| 10))
//!     .then(Step::map(|x: i32| x + 5))
//!     .then(Step::map(|x: i32| x * 2))
//!     .then(Step::map(move |x: i32| sink.store(x, Ordering::SeqCst)))
//!     .submit(&dispatcher);
//!
//! assert_eq!(observed.load(Ordering::SeqCst), 30);
//! ```

mod chain;
mod execution;
mod step;

pub use chain::{task, task_on, IntoBulk, IntoUnit, Task, Unit};
pub use step::Step;
