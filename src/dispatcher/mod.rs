//! # Dispatcher
//!
//! Explicit registry mapping each channel identity to its single executor,
//! plus the routing functions built on it. A [`Dispatcher`] is a cheap,
//! cloneable handle; clones share one registry. Executors are created lazily
//! on first resolution and live as long as the registry.
//!
//! Queued work holds a handle to the registry it was queued on, so
//! undispatched jobs keep the registry (and each other) alive after every
//! caller-held handle is gone. [`Dispatcher::clear`] drops all executors and
//! their pending work, resolving any waiting handles to `Abandoned`.
//!
//! Every routing function resolves the channel's executor, releases the
//! registry entry, then calls into the executor, so jobs may freely post to
//! other channels (or their own) while they run.
//!
//! ```rust
//! use tasker_chain::{channel, Dispatcher};
//! use tasker_chain::executors::QueueExecutor;
//!
//! channel! {
//!     struct Background: &'static str = "background" => QueueExecutor;
//! }
//!
//! let dispatcher = Dispatcher::new();
//! let answer = dispatcher.post_future::<Background, _>(|| 6 * 7);
//! dispatcher.dispatch::<Background>();
//! assert_eq!(answer.wait().unwrap(), 42);
//! ```

pub mod driver;

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::channel::{Channel, ChannelKey, ChannelRef};
use crate::config::{ChainConfig, ConfigManager};
use crate::executors::{
    Executor, ExecutorExt, ExecutorStats, InlineExecutor, Job, TaskFuture,
};

pub use driver::DispatchLoop;

/// Handle to a channel → executor registry
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

struct Registry {
    config: ChainConfig,
    inline: Arc<dyn Executor>,
    executors: DashMap<ChannelKey, RegisteredExecutor>,
}

struct RegisteredExecutor {
    name: String,
    executor: Arc<dyn Executor>,
}

/// Snapshot of one registered channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStats {
    pub name: String,
    pub stats: ExecutorStats,
}

/// Snapshot of every executor created so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    pub channels: Vec<ChannelStats>,
}

impl DispatcherStats {
    pub fn total_pending(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.stats.pending + channel.stats.deferred)
            .sum()
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelStats> {
        self.channels.iter().find(|channel| channel.name == name)
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self {
            registry: Arc::new(Registry {
                config,
                inline: Arc::new(InlineExecutor::new()),
                executors: DashMap::new(),
            }),
        }
    }

    pub fn from_manager(manager: &ConfigManager) -> Self {
        Self::with_config(manager.config().clone())
    }

    pub fn config(&self) -> &ChainConfig {
        &self.registry.config
    }

    /// Resolve the executor bound to `C`, creating it on first use
    pub fn get_executor<C: Channel>(&self) -> Arc<dyn Executor> {
        self.resolve(ChannelRef::of::<C>())
    }

    pub(crate) fn resolve(&self, channel: Option<ChannelRef>) -> Arc<dyn Executor> {
        let Some(channel) = channel else {
            return Arc::clone(&self.registry.inline);
        };

        let key = (channel.key)();
        if let Some(entry) = self.registry.executors.get(&key) {
            return Arc::clone(&entry.executor);
        }

        let entry = self
            .registry
            .executors
            .entry(key)
            .or_insert_with(|| {
                let executor = (channel.build)(&self.registry.config.executors);
                let name = (channel.name)();
                info!(
                    channel = %name,
                    policy = %executor.policy(),
                    "📡 DISPATCHER: Created channel executor"
                );
                RegisteredExecutor { name, executor }
            });
        Arc::clone(&entry.executor)
    }

    /// One-way execution on `C`
    pub fn post<C: Channel>(&self, job: impl FnOnce() + Send + 'static) {
        self.get_executor::<C>().execute(Box::new(job));
    }

    /// Deferred one-way execution on `C`
    pub fn post_defer<C: Channel>(&self, job: impl FnOnce() + Send + 'static) {
        self.get_executor::<C>().defer_execute(Box::new(job));
    }

    /// One-way execution of a group on `C`, enqueued in iteration order
    pub fn post_bulk<C: Channel>(
        &self,
        jobs: impl IntoIterator<Item = impl FnOnce() + Send + 'static>,
    ) {
        let jobs: Vec<Job> = jobs.into_iter().map(|job| Box::new(job) as Job).collect();
        self.get_executor::<C>().bulk_execute(jobs);
    }

    /// Two-way execution on `C`
    pub fn post_future<C: Channel, R: Send + 'static>(
        &self,
        callable: impl FnOnce() -> R + Send + 'static,
    ) -> TaskFuture<R> {
        self.get_executor::<C>().future_execute(callable)
    }

    /// Two-way execution of a group on `C`, one handle per callable in order
    pub fn post_future_bulk<C: Channel, R: Send + 'static>(
        &self,
        callables: impl IntoIterator<Item = impl FnOnce() -> R + Send + 'static>,
    ) -> Vec<TaskFuture<R>> {
        self.get_executor::<C>().future_bulk_execute(callables)
    }

    /// Advance pending work on `C`
    pub fn dispatch<C: Channel>(&self) {
        self.get_executor::<C>().dispatch();
    }

    /// Drop every channel executor together with its undispatched work
    ///
    /// Later use of a channel creates a fresh executor. Work already running
    /// on another thread finishes normally.
    pub fn clear(&self) {
        let keys: Vec<ChannelKey> = self
            .registry
            .executors
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let mut pending = 0;
        for key in keys {
            // Removed entries drop outside the map's shard lock.
            if let Some((_, entry)) = self.registry.executors.remove(&key) {
                let stats = entry.executor.stats();
                pending += stats.pending + stats.deferred;
                drop(entry);
            }
        }
        info!(pending, "🧹 DISPATCHER: Cleared channel executors");
    }

    /// Number of channel executors created so far
    pub fn channel_count(&self) -> usize {
        self.registry.executors.len()
    }

    pub fn stats(&self) -> DispatcherStats {
        let mut channels: Vec<ChannelStats> = self
            .registry
            .executors
            .iter()
            .map(|entry| (entry.name.clone(), Arc::clone(&entry.executor)))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(name, executor)| ChannelStats {
                name,
                stats: executor.stats(),
            })
            .collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));

        DispatcherStats { channels }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("channels", &self.channel_count())
            .finish()
    }
}
