#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Chain
//!
//! Composable task/continuation engine: chains of steps that hop across
//! independently scheduled channels, carrying a value (or a placeholder for
//! none) forward, with mid-chain cancellation and deferral.
//!
//! ## Architecture
//!
//! A **channel** is a type-level identity bound to one executor policy. The
//! [`Dispatcher`] resolves each channel to a single lazily-created executor and
//! routes work to it. A [`Task`] records steps and hops without touching any
//! channel; `submit` starts an execution that walks the chain, posting itself
//! to each channel it hops to.
//!
//! ## Executor Policies
//!
//! - **Inline**: runs immediately in the caller's stack
//! - **Queue**: FIFO drained on dispatch, deferred work waits a full cycle
//! - **Async**: a new thread per job, dispatch only reaps finished threads
//! - **Strand**: ordered batches, work queued during a batch runs next time
//!
//! ## Module Organization
//!
//! - [`task`] - Chain builder and execution
//! - [`executors`] - The four policies and promise/future handles
//! - [`channel`] - Channel identities and the [`channel!`] macro
//! - [`dispatcher`] - Registry, routing functions and [`DispatchLoop`]
//! - [`placeholder`] - Void/value normalization
//! - [`execution_context`] - Cancel/defer signal
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use tasker_chain::executors::QueueExecutor;
//! use tasker_chain::{channel, task_on, Dispatcher, Step};
//!
//! channel! {
//!     pub struct Io: &'static str = "io" => QueueExecutor;
//!     pub struct Ui: &'static str = "ui" => QueueExecutor;
//! }
//!
//! let dispatcher = Dispatcher::new();
//! let result = task_on(Io, Step::new(|| 20))
//!     .then_on(Ui, Step::map(|x: i32| x + 22))
//!     .submit_future(&dispatcher);
//!
//! dispatcher.dispatch::<Io>();
//! dispatcher.dispatch::<Ui>();
//! assert_eq!(result.wait().unwrap(), 42);
//! ```

pub mod channel;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod execution_context;
pub mod executors;
pub mod logging;
pub mod placeholder;
pub mod task;

pub use channel::{Channel, ChannelKey, NoChannel};
pub use config::{ChainConfig, ConfigManager};
pub use dispatcher::{ChannelStats, DispatchLoop, Dispatcher, DispatcherStats};
pub use error::{ChainError, Result};
pub use execution_context::ExecutionContext;
pub use executors::{
    AsyncExecutor, Executor, ExecutorExt, ExecutorPolicy, ExecutorStats, InlineExecutor,
    QueueExecutor, StrandExecutor, TaskFuture,
};
pub use logging::init_structured_logging;
pub use placeholder::{Payload, Placeholder};
pub use task::{task, task_on, IntoBulk, IntoUnit, Step, Task};
