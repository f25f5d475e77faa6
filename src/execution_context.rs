//! # Execution Context
//!
//! Per-invocation signal a step may accept as its leading parameter. A fresh
//! context is built for exactly one step invocation and read once by the
//! engine afterwards.

/// Cancel / defer signal for one step invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    canceled: bool,
    deferred: bool,
}

/// What the engine does after reading a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Hand the step's result to the rest of the chain
    Proceed,
    /// Drop the remainder of the chain
    Cancel,
    /// Retry the same step with the same input on a later dispatch
    Defer,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all further continuations of this chain invocation
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Ask for this step to be attempted again, unchanged, on a later dispatch
    /// of the channel it runs on
    pub fn defer(&mut self) {
        self.deferred = true;
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Cancellation is checked first and is final.
    pub fn signal(&self) -> Signal {
        if self.canceled {
            Signal::Cancel
        } else if self.deferred {
            Signal::Defer
        } else {
            Signal::Proceed
        }
    }
}
