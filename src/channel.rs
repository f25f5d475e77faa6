//! # Channels
//!
//! A channel is a type-level identity: an identifier type, an identifier value
//! and the executor policy bound to it. The [`Dispatcher`](crate::Dispatcher)
//! keeps exactly one executor per distinct identity.
//!
//! ```rust
//! use tasker_chain::channel;
//! use tasker_chain::executors::{QueueExecutor, StrandExecutor};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! pub enum Lane {
//!     Io,
//!     Render,
//! }
//!
//! channel! {
//!     pub struct IoLane: Lane = Lane::Io => QueueExecutor;
//!     pub struct RenderLane: Lane = Lane::Render => StrandExecutor;
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::ExecutorConfig;
use crate::constants::NO_CHANNEL_NAME;
use crate::executors::{Executor, InlineExecutor};

/// A named scheduling domain bound to one executor policy
pub trait Channel: Send + Sync + 'static {
    type Id: fmt::Debug + Hash + Eq + Copy + Send + Sync + 'static;
    type Executor: Executor;

    const ID: Self::Id;

    /// Human-readable name used in logs and stats
    fn name() -> String {
        format!("{:?}", Self::ID)
    }
}

/// Absence of a channel: the step runs wherever the chain currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoChannel;

impl Channel for NoChannel {
    type Id = ();
    type Executor = InlineExecutor;

    const ID: Self::Id = ();

    fn name() -> String {
        NO_CHANNEL_NAME.to_string()
    }
}

/// Registry key: identifier type, identifier value and executor type
///
/// The identifier value is kept in full, so distinct values never share a
/// key even when their hashes collide.
#[derive(Debug, Clone)]
pub struct ChannelKey {
    id_type: TypeId,
    id: Arc<dyn ChannelId>,
    executor_type: TypeId,
}

impl ChannelKey {
    pub fn of<C: Channel>() -> Self {
        Self {
            id_type: TypeId::of::<C::Id>(),
            id: Arc::new(C::ID),
            executor_type: TypeId::of::<C::Executor>(),
        }
    }
}

impl PartialEq for ChannelKey {
    fn eq(&self, other: &Self) -> bool {
        self.id_type == other.id_type
            && self.executor_type == other.executor_type
            && self.id.eq_id(other.id.as_ref())
    }
}

impl Eq for ChannelKey {}

impl Hash for ChannelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id_type.hash(state);
        self.executor_type.hash(state);
        self.id.hash_id(state);
    }
}

/// Object-safe view of a [`Channel::Id`] value
trait ChannelId: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_id(&self, other: &dyn ChannelId) -> bool;
    fn hash_id(&self, state: &mut dyn Hasher);
}

impl<T: fmt::Debug + Hash + Eq + Send + Sync + 'static> ChannelId for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_id(&self, other: &dyn ChannelId) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn hash_id(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Type-erased channel identity captured by a chain at build time
#[derive(Clone, Copy)]
pub(crate) struct ChannelRef {
    pub(crate) key: fn() -> ChannelKey,
    pub(crate) name: fn() -> String,
    pub(crate) build: fn(&ExecutorConfig) -> Arc<dyn Executor>,
}

impl ChannelRef {
    /// `None` for [`NoChannel`], which never forces a hop
    pub(crate) fn of<C: Channel>() -> Option<Self> {
        if TypeId::of::<C>() == TypeId::of::<NoChannel>() {
            return None;
        }
        Some(Self {
            key: ChannelKey::of::<C>,
            name: C::name,
            build: build_executor::<C::Executor>,
        })
    }
}

impl fmt::Debug for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChannelRef").field(&(self.name)()).finish()
    }
}

pub(crate) fn build_executor<E: Executor>(config: &ExecutorConfig) -> Arc<dyn Executor> {
    Arc::new(E::with_config(config))
}

/// Declare zero-sized channel marker types
///
/// Each declaration `struct Name: IdType = id_value => ExecutorType;` creates
/// a marker implementing [`Channel`].
#[macro_export]
macro_rules! channel {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident : $id_ty:ty = $id:expr => $executor:ty);+ $(;)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            $vis struct $name;

            impl $crate::channel::Channel for $name {
                type Id = $id_ty;
                type Executor = $executor;

                const ID: Self::Id = $id;
            }
        )+
    };
}
