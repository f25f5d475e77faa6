//! # Chain Execution
//!
//! One submission of a chain. Channel-less stretches run in a loop rather
//! than by recursion: the execution keeps a stack of frames (one per entered
//! chain, nested chains included) and walks their links until it either
//! finishes, hops to a channel, or is stopped by a cancel or defer signal.
//!
//! A hop moves the whole execution into a job on the target channel; the
//! job resumes the loop when that channel runs it. Hops onto an inline
//! channel stay in the loop. A deferral moves the
//! execution, positioned at the same step with the same input, into a
//! deferred job on the channel the step was running on.

use std::sync::Arc;
use tracing::{debug, error, trace};
use uuid::Uuid;

use super::chain::{ChainSpec, Link, Unit, UnitKind};
use super::step::{ErasedStep, Invocation};
use crate::channel::ChannelRef;
use crate::dispatcher::Dispatcher;
use crate::executors::{Executor, ExecutorPolicy, Job};
use crate::placeholder::Payload;

struct Frame {
    spec: Arc<ChainSpec>,
    next: usize,
}

pub(crate) struct Execution {
    id: Uuid,
    dispatcher: Dispatcher,
    frames: Vec<Frame>,
    /// Channel the execution is currently running on; `None` is the submitter's stack
    current: Option<ChannelRef>,
}

impl Execution {
    fn new(dispatcher: Dispatcher, current: Option<ChannelRef>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dispatcher,
            frames: Vec::new(),
            current,
        }
    }

    pub(crate) fn start(dispatcher: Dispatcher, spec: Arc<ChainSpec>, input: Payload) {
        let execution = Self::new(dispatcher, None);
        debug!(
            execution_id = %execution.id,
            anchor = ?spec.anchor,
            links = spec.links.len(),
            "🚀 CHAIN: Submitted"
        );
        execution.drive(Unit::chain(spec), input);
    }

    fn drive(mut self, unit: Unit, input: Payload) {
        let mut unit = unit;
        let mut value = input;

        'chain: loop {
            match unit.kind {
                UnitKind::Step(step) => {
                    trace!(
                        execution_id = %self.id,
                        step = step.label(),
                        arity = ?step.arity(),
                        "Invoking step"
                    );
                    match step.invoke(value) {
                        Invocation::Produced(output) => value = output,
                        Invocation::Canceled => {
                            debug!(
                                execution_id = %self.id,
                                step = step.label(),
                                "🛑 CHAIN: Canceled, remaining continuations dropped"
                            );
                            return;
                        }
                        Invocation::Deferred(input) => {
                            self.defer(step, input);
                            return;
                        }
                        Invocation::Failed(e) => {
                            error!(
                                execution_id = %self.id,
                                step = step.label(),
                                error = %e,
                                "❌ CHAIN: Step could not be invoked, execution dropped"
                            );
                            return;
                        }
                    }
                }
                UnitKind::Chain(spec) => {
                    let head = spec.head.clone();
                    let anchor = spec.anchor;
                    self.frames.push(Frame { spec, next: 0 });

                    let Some(channel) = anchor else {
                        unit = head;
                        continue 'chain;
                    };
                    match self.enter(channel) {
                        Some(executor) => {
                            executor.execute(Box::new(move || self.drive(head, value)));
                            return;
                        }
                        None => {
                            unit = head;
                            continue 'chain;
                        }
                    }
                }
            }

            loop {
                match self.next_link() {
                    None => {
                        trace!(execution_id = %self.id, "Chain complete");
                        return;
                    }
                    Some(Link::Then {
                        unit: next,
                        channel: None,
                    }) => {
                        unit = next;
                        continue 'chain;
                    }
                    Some(Link::Then {
                        unit: next,
                        channel: Some(channel),
                    }) => match self.enter(channel) {
                        Some(executor) => {
                            executor.execute(Box::new(move || self.drive(next, value)));
                            return;
                        }
                        None => {
                            unit = next;
                            continue 'chain;
                        }
                    },
                    Some(Link::Post { unit: side, channel }) => self.detach(side, channel),
                    Some(Link::Bulk { units, channel }) => self.detach_bulk(units, channel),
                }
            }
        }
    }

    /// Next link of the innermost unfinished chain, leaving finished ones
    fn next_link(&mut self) -> Option<Link> {
        while let Some(frame) = self.frames.last_mut() {
            if let Some(link) = frame.spec.links.get(frame.next) {
                frame.next += 1;
                return Some(link.clone());
            }
            self.frames.pop();
        }
        None
    }

    /// Make `channel` current, returning its executor unless it runs inline
    ///
    /// An inline executor would run the hop job on this stack, so the caller
    /// keeps looping instead.
    fn enter(&mut self, channel: ChannelRef) -> Option<Arc<dyn Executor>> {
        let executor = self.dispatcher.resolve(Some(channel));
        self.current = Some(channel);
        trace!(execution_id = %self.id, channel = ?channel, "Hop");
        (executor.policy() != ExecutorPolicy::Inline).then_some(executor)
    }

    /// Continue this execution on `channel`, starting with `unit`
    fn hop(mut self, channel: ChannelRef, unit: Unit, value: Payload) {
        match self.enter(channel) {
            Some(executor) => executor.execute(Box::new(move || self.drive(unit, value))),
            None => self.drive(unit, value),
        }
    }

    /// Retry `step` with `input` on a later dispatch of the current channel
    fn defer(self, step: ErasedStep, input: Payload) {
        let executor = self.dispatcher.resolve(self.current);
        debug!(
            execution_id = %self.id,
            step = step.label(),
            channel = ?self.current,
            "⏸️ CHAIN: Step deferred"
        );
        executor.defer_execute(Box::new(move || self.drive(Unit::step(step), input)));
    }

    /// Start a side execution of `unit` that takes no input
    fn detach(&self, unit: Unit, channel: Option<ChannelRef>) {
        let side = Self::new(self.dispatcher.clone(), channel.or(self.current));
        trace!(
            execution_id = %self.id,
            side_execution_id = %side.id,
            "Side continuation"
        );

        match channel {
            Some(channel) => side.hop(channel, unit, Payload::Placeholder),
            None => side.drive(unit, Payload::Placeholder),
        }
    }

    fn detach_bulk(&self, units: Vec<Unit>, channel: Option<ChannelRef>) {
        let Some(channel) = channel else {
            for unit in units {
                self.detach(unit, None);
            }
            return;
        };

        let jobs: Vec<Job> = units
            .into_iter()
            .map(|unit| {
                let side = Self::new(self.dispatcher.clone(), Some(channel));
                Box::new(move || side.drive(unit, Payload::Placeholder)) as Job
            })
            .collect();

        trace!(
            execution_id = %self.id,
            channel = ?channel,
            count = jobs.len(),
            "Bulk side continuations"
        );
        self.dispatcher.resolve(Some(channel)).bulk_execute(jobs);
    }
}
