//! # Steps
//!
//! A [`Step`] wraps one caller-supplied callable and records, once, how many
//! data parameters it declares ([`Arity`]) and whether it takes a leading
//! [`ExecutionContext`]. The engine never inspects the callable again; it
//! only calls the erased form and reads the context afterwards.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ChainError, Result};
use crate::execution_context::{ExecutionContext, Signal};
use crate::placeholder::{Arity, Payload};

type PlainFn = Arc<dyn Fn(Payload) -> Result<Payload> + Send + Sync>;
type ContextualFn = Arc<dyn Fn(&mut ExecutionContext, &Payload) -> Result<Payload> + Send + Sync>;

/// Callable after erasure; the variant is the context capability flag
#[derive(Clone)]
pub(crate) enum StepFn {
    Plain(PlainFn),
    Contextual(ContextualFn),
}

/// Type-erased step stored in a chain description
#[derive(Clone)]
pub(crate) struct ErasedStep {
    call: StepFn,
    arity: Arity,
    label: Option<Arc<str>>,
}

/// Outcome of one step invocation
pub(crate) enum Invocation {
    Produced(Payload),
    Canceled,
    /// Carries the unchanged input so the same step can be retried with it
    Deferred(Payload),
    Failed(ChainError),
}

impl StepFn {
    fn plain<F>(f: F) -> Self
    where
        F: Fn(Payload) -> Result<Payload> + Send + Sync + 'static,
    {
        StepFn::Plain(Arc::new(f))
    }

    fn contextual<F>(f: F) -> Self
    where
        F: Fn(&mut ExecutionContext, &Payload) -> Result<Payload> + Send + Sync + 'static,
    {
        StepFn::Contextual(Arc::new(f))
    }
}

impl ErasedStep {
    pub(crate) fn invoke(&self, input: Payload) -> Invocation {
        match &self.call {
            StepFn::Plain(call) => match call(input) {
                Ok(output) => Invocation::Produced(output),
                Err(e) => Invocation::Failed(e),
            },
            StepFn::Contextual(call) => {
                let mut context = ExecutionContext::new();
                match call(&mut context, &input) {
                    Err(e) => Invocation::Failed(e),
                    Ok(output) => match context.signal() {
                        Signal::Proceed => Invocation::Produced(output),
                        Signal::Cancel => Invocation::Canceled,
                        Signal::Defer => Invocation::Deferred(input),
                    },
                }
            }
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("anonymous")
    }

    pub(crate) fn arity(&self) -> Arity {
        self.arity
    }
}

impl fmt::Debug for ErasedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label())
            .field("arity", &self.arity)
            .field("contextual", &matches!(self.call, StepFn::Contextual(_)))
            .finish()
    }
}

/// One unit of work taking `I` and producing `O`
///
/// Closures are shared rather than consumed, so a chain holding this step
/// can be submitted any number of times. Steps needing mutable state should
/// hold it behind an atomic or a lock.
///
/// ```rust
/// use tasker_chain::{ExecutionContext, Step};
///
/// let ten: Step<(), i32> = Step::new(|| 10);
/// let add_five = Step::map(|x: i32| x + 5);
/// let guarded = Step::with_context_map(|cx: &mut ExecutionContext, x: &i32| {
///     if *x < 0 {
///         cx.cancel();
///     }
///     *x
/// });
/// # let _ = (ten, add_five, guarded);
/// ```
pub struct Step<I, O> {
    erased: ErasedStep,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O> Step<I, O>
where
    I: 'static,
    O: Send + 'static,
{
    /// Step declaring no parameter; whatever the chain carries is dropped
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> O + Send + Sync + 'static,
    {
        Self::erase(
            StepFn::plain(move |_input| Ok(Payload::from_output(f()))),
            Arity::Nullary,
        )
    }

    /// Step taking the carried value by move
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Self::erase(
            StepFn::plain(move |input| Ok(Payload::from_output(f(input.take::<I>()?)))),
            Arity::Unary,
        )
    }

    /// Context-aware step declaring no data parameter
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(&mut ExecutionContext) -> O + Send + Sync + 'static,
    {
        Self::erase(
            StepFn::contextual(move |context, _input| Ok(Payload::from_output(f(context)))),
            Arity::Nullary,
        )
    }

    /// Context-aware step borrowing the carried value
    ///
    /// The value is borrowed so that a deferral can hand the very same input
    /// to the retried invocation.
    pub fn with_context_map<F>(f: F) -> Self
    where
        F: Fn(&mut ExecutionContext, &I) -> O + Send + Sync + 'static,
    {
        Self::erase(
            StepFn::contextual(move |context, input| {
                Ok(Payload::from_output(f(context, input.peek::<I>()?)))
            }),
            Arity::Unary,
        )
    }

    fn erase(call: StepFn, arity: Arity) -> Self {
        Self {
            erased: ErasedStep {
                call,
                arity,
                label: None,
            },
            _marker: PhantomData,
        }
    }
}

impl<I, O> Step<I, O> {
    /// Attach a label reported in tracing output
    pub fn named(mut self, label: impl Into<Arc<str>>) -> Self {
        self.erased.label = Some(label.into());
        self
    }

    pub fn arity(&self) -> Arity {
        self.erased.arity
    }

    pub fn is_contextual(&self) -> bool {
        matches!(self.erased.call, StepFn::Contextual(_))
    }

    pub(crate) fn into_erased(self) -> ErasedStep {
        self.erased
    }
}

impl<I, O> Clone for Step<I, O> {
    fn clone(&self) -> Self {
        Self {
            erased: self.erased.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Step<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.erased, f)
    }
}
