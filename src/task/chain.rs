//! # Chain Description
//!
//! Immutable, shareable description of a chain: an optional anchor channel,
//! a head unit and the links appended by the builder. A unit is either a
//! single step or a whole nested chain. Building never touches a channel or
//! an executor; only submission does.

use parking_lot::Mutex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::execution::Execution;
use super::step::{ErasedStep, Step};
use crate::channel::{Channel, ChannelRef};
use crate::dispatcher::Dispatcher;
use crate::executors::{promise, TaskFuture};
use crate::placeholder::Payload;

#[derive(Clone)]
pub(crate) struct ChainSpec {
    pub(crate) anchor: Option<ChannelRef>,
    pub(crate) head: Unit,
    pub(crate) links: Vec<Link>,
}

#[derive(Clone)]
pub(crate) enum Link {
    /// Data-flow continuation
    Then {
        unit: Unit,
        channel: Option<ChannelRef>,
    },
    /// Side continuation; the carried value passes through untouched
    Post {
        unit: Unit,
        channel: Option<ChannelRef>,
    },
    /// Fan-out of side continuations at one point
    Bulk {
        units: Vec<Unit>,
        channel: Option<ChannelRef>,
    },
}

/// Erased step or nested chain accepted by the builder
#[doc(hidden)]
#[derive(Clone)]
pub struct Unit {
    pub(crate) kind: UnitKind,
}

#[derive(Clone)]
pub(crate) enum UnitKind {
    Step(ErasedStep),
    Chain(Arc<ChainSpec>),
}

impl Unit {
    pub(crate) fn step(step: ErasedStep) -> Self {
        Self {
            kind: UnitKind::Step(step),
        }
    }

    pub(crate) fn chain(spec: Arc<ChainSpec>) -> Self {
        Self {
            kind: UnitKind::Chain(spec),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            UnitKind::Step(step) => fmt::Debug::fmt(step, f),
            UnitKind::Chain(spec) => f
                .debug_struct("Chain")
                .field("anchor", &spec.anchor)
                .field("links", &spec.links.len())
                .finish(),
        }
    }
}

/// Anything usable as one unit of a chain that receives `I`
///
/// Implemented for [`Step`] and for [`Task`], owned or borrowed, so a built
/// chain nests wherever a step is accepted.
pub trait IntoUnit<I> {
    type Output: Send + 'static;

    fn into_unit(self) -> Unit;
}

impl<I, O: Send + 'static> IntoUnit<I> for Step<I, O> {
    type Output = O;

    fn into_unit(self) -> Unit {
        Unit::step(self.into_erased())
    }
}

impl<I, O: Send + 'static> IntoUnit<I> for Task<I, O> {
    type Output = O;

    fn into_unit(self) -> Unit {
        Unit::chain(self.spec)
    }
}

impl<I, O: Send + 'static> IntoUnit<I> for &Task<I, O> {
    type Output = O;

    fn into_unit(self) -> Unit {
        Unit::chain(Arc::clone(&self.spec))
    }
}

/// A group of side steps for `post_bulk`, in argument order
pub trait IntoBulk {
    fn into_units(self) -> Vec<Unit>;
}

macro_rules! impl_into_bulk_for_tuple {
    ($($unit:ident),+) => {
        impl<$($unit: IntoUnit<()>),+> IntoBulk for ($($unit,)+) {
            #[allow(non_snake_case)]
            fn into_units(self) -> Vec<Unit> {
                let ($($unit,)+) = self;
                vec![$($unit.into_unit()),+]
            }
        }
    };
}

impl_into_bulk_for_tuple!(A);
impl_into_bulk_for_tuple!(A, B);
impl_into_bulk_for_tuple!(A, B, C);
impl_into_bulk_for_tuple!(A, B, C, D);
impl_into_bulk_for_tuple!(A, B, C, D, E);
impl_into_bulk_for_tuple!(A, B, C, D, E, F);
impl_into_bulk_for_tuple!(A, B, C, D, E, F, G);
impl_into_bulk_for_tuple!(A, B, C, D, E, F, G, H);

impl<S: IntoUnit<()>> IntoBulk for Vec<S> {
    fn into_units(self) -> Vec<Unit> {
        self.into_iter().map(IntoUnit::into_unit).collect()
    }
}

impl<S: IntoUnit<()>, const N: usize> IntoBulk for [S; N] {
    fn into_units(self) -> Vec<Unit> {
        self.into_iter().map(IntoUnit::into_unit).collect()
    }
}

/// Immutable chain taking `I` and finally carrying `O`
///
/// Cloning is cheap and builder calls on a clone never affect the original.
/// A chain can be submitted any number of times.
pub struct Task<I, O> {
    spec: Arc<ChainSpec>,
    _marker: PhantomData<fn(I) -> O>,
}

/// Start a chain whose first step runs in the submitting call stack
pub fn task<S: IntoUnit<()>>(step: S) -> Task<(), S::Output> {
    Task::new(step)
}

/// Start a chain whose first step is posted to `channel`
pub fn task_on<C: Channel, S: IntoUnit<()>>(channel: C, step: S) -> Task<(), S::Output> {
    Task::on(channel, step)
}

impl<I, O: Send + 'static> Task<I, O> {
    /// Chain taking a typed input, for nesting or [`Task::submit_with`]
    pub fn new<S: IntoUnit<I, Output = O>>(step: S) -> Self {
        Self::anchored(None, step.into_unit())
    }

    /// Chain whose first step always runs on `C`
    pub fn on<C: Channel, S: IntoUnit<I, Output = O>>(_channel: C, step: S) -> Self {
        Self::anchored(ChannelRef::of::<C>(), step.into_unit())
    }

    fn anchored(anchor: Option<ChannelRef>, head: Unit) -> Self {
        Self::from_spec(Arc::new(ChainSpec {
            anchor,
            head,
            links: Vec::new(),
        }))
    }

    fn from_spec(spec: Arc<ChainSpec>) -> Self {
        Self {
            spec,
            _marker: PhantomData,
        }
    }

    fn push<P>(self, link: Link) -> Task<I, P> {
        let mut spec = self.spec;
        Arc::make_mut(&mut spec).links.push(link);
        Task {
            spec,
            _marker: PhantomData,
        }
    }

    /// Feed the current result into `step`, in whatever call stack reaches it
    pub fn then<S: IntoUnit<O>>(self, step: S) -> Task<I, S::Output> {
        self.push(Link::Then {
            unit: step.into_unit(),
            channel: None,
        })
    }

    /// Feed the current result into `step`, posted to `C`
    pub fn then_on<C: Channel, S: IntoUnit<O>>(self, _channel: C, step: S) -> Task<I, S::Output> {
        self.push(Link::Then {
            unit: step.into_unit(),
            channel: ChannelRef::of::<C>(),
        })
    }

    /// Run `step` for its side effect; the current result flows on unchanged
    pub fn post<S: IntoUnit<()>>(self, step: S) -> Self {
        self.push(Link::Post {
            unit: step.into_unit(),
            channel: None,
        })
    }

    pub fn post_on<C: Channel, S: IntoUnit<()>>(self, _channel: C, step: S) -> Self {
        self.push(Link::Post {
            unit: step.into_unit(),
            channel: ChannelRef::of::<C>(),
        })
    }

    /// Run every step of `steps` for its side effect, in argument order
    pub fn post_bulk<B: IntoBulk>(self, steps: B) -> Self {
        self.push(Link::Bulk {
            units: steps.into_units(),
            channel: None,
        })
    }

    /// Post every step of `steps` individually to `C`
    ///
    /// Relative order then follows `C`'s policy.
    pub fn post_bulk_on<C: Channel, B: IntoBulk>(self, _channel: C, steps: B) -> Self {
        self.push(Link::Bulk {
            units: steps.into_units(),
            channel: ChannelRef::of::<C>(),
        })
    }

    /// Number of links appended after the head
    pub fn len(&self) -> usize {
        self.spec.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.links.is_empty()
    }

    /// Whether the head is posted to a channel rather than run by the submitter
    pub fn is_anchored(&self) -> bool {
        self.spec.anchor.is_some()
    }
}

impl<I: Send + 'static, O: Send + 'static> Task<I, O> {
    /// Start an execution with `input` as the head's argument
    pub fn submit_with(&self, dispatcher: &Dispatcher, input: I) {
        Execution::start(
            dispatcher.clone(),
            Arc::clone(&self.spec),
            Payload::from_output(input),
        );
    }

    /// Start an execution and receive a handle to its final value
    ///
    /// The handle resolves to [`ChainError::Abandoned`](crate::ChainError::Abandoned)
    /// when a step cancels the execution.
    pub fn submit_future_with(&self, dispatcher: &Dispatcher, input: I) -> TaskFuture<O> {
        let (promise, future) = promise();
        let slot = Arc::new(Mutex::new(Some(promise)));

        let sink = Step::map(move |value: O| {
            if let Some(promise) = slot.lock().take() {
                promise.set(value);
            }
        })
        .named("submit_future");

        let completed = self.clone().then(sink);
        Execution::start(
            dispatcher.clone(),
            completed.spec,
            Payload::from_output(input),
        );
        future
    }
}

impl<O: Send + 'static> Task<(), O> {
    /// Start an execution of this chain
    ///
    /// A channel-less prefix runs in the caller's stack up to the first
    /// channel hop, which is posted. The chain stays usable afterwards.
    pub fn submit(&self, dispatcher: &Dispatcher) {
        self.submit_with(dispatcher, ());
    }

    pub fn submit_future(&self, dispatcher: &Dispatcher) -> TaskFuture<O> {
        self.submit_future_with(dispatcher, ())
    }
}

impl<I, O> Clone for Task<I, O> {
    fn clone(&self) -> Self {
        Self {
            spec: Arc::clone(&self.spec),
            _marker: PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Task<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("anchor", &self.spec.anchor)
            .field("head", &self.spec.head)
            .field("links", &self.spec.links.len())
            .finish()
    }
}
