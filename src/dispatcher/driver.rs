//! # Dispatch Loop
//!
//! Opt-in helper that dispatches one channel from a dedicated thread at a
//! fixed interval until stopped or dropped. Useful for Async channels (which
//! only need dispatch to reap finished threads) and for applications that
//! prefer a background driver over an explicit dispatch call site.

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info};

use super::Dispatcher;
use crate::channel::Channel;
use crate::error::{ChainError, Result};

/// Background thread dispatching a single channel
#[derive(Debug)]
pub struct DispatchLoop {
    channel: String,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl DispatchLoop {
    /// Start dispatching `C` every `dispatch_loop.dispatch_interval_ms`
    pub fn spawn<C: Channel>(dispatcher: &Dispatcher) -> Result<Self> {
        let interval = dispatcher.config().dispatch_loop.interval();
        Self::spawn_with_interval::<C>(dispatcher, interval)
    }

    pub fn spawn_with_interval<C: Channel>(
        dispatcher: &Dispatcher,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(ChainError::Configuration(
                "dispatch interval must be greater than zero".to_string(),
            ));
        }

        let channel = C::name();
        let executor = dispatcher.get_executor::<C>();
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread_name = format!(
            "{}-{channel}",
            dispatcher.config().dispatch_loop.thread_name_prefix
        );

        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                let mut cycles = 0u64;
                loop {
                    executor.dispatch();
                    cycles += 1;
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                cycles
            })
            .map_err(|e| ChainError::Spawn(e.to_string()))?;

        info!(
            channel = %channel,
            interval_ms = interval.as_millis() as u64,
            "🔄 DISPATCH LOOP: Started"
        );

        Ok(Self {
            channel,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Stop the loop and wait for its thread to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        let Some(handle) = self.handle.take() else {
            return;
        };

        // Dropped from inside its own thread: the loop exits on the signal above.
        if handle.thread().id() == thread::current().id() {
            return;
        }

        match handle.join() {
            Ok(cycles) => info!(
                channel = %self.channel,
                cycles,
                "🛑 DISPATCH LOOP: Stopped"
            ),
            Err(_) => error!(
                channel = %self.channel,
                "❌ DISPATCH LOOP: Thread panicked while dispatching"
            ),
        }
    }
}

impl Drop for DispatchLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}
