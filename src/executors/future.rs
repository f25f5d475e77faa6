//! # Promise / Future Handles
//!
//! Result channel used by two-way execution. A [`Promise`] travels with the
//! job; the caller keeps the [`TaskFuture`]. Dropping the promise without
//! setting it (the job was discarded, canceled or panicked) resolves the
//! handle to [`ChainError::Abandoned`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::utils::Backoff;
use futures::channel::oneshot;

use crate::error::{ChainError, Result};

/// Longest single sleep between readiness checks in [`TaskFuture::wait_timeout`]
const MAX_POLL_SLEEP: Duration = Duration::from_millis(1);

/// Create a connected promise / future pair
pub fn promise<R>() -> (Promise<R>, TaskFuture<R>) {
    let (sender, receiver) = oneshot::channel();
    (
        Promise { sender },
        TaskFuture {
            receiver,
            slot: Slot::Pending,
        },
    )
}

/// Write side of a result channel
#[derive(Debug)]
pub struct Promise<R> {
    sender: oneshot::Sender<R>,
}

impl<R> Promise<R> {
    /// Satisfy the paired future; a no-op if it was already dropped
    pub fn set(self, value: R) {
        let _ = self.sender.send(value);
    }
}

#[derive(Debug)]
enum Slot<R> {
    Pending,
    Ready(R),
    Abandoned,
    Taken,
}

/// Read side of a result channel
///
/// Can be waited on from a plain thread or awaited from async code.
#[derive(Debug)]
pub struct TaskFuture<R> {
    receiver: oneshot::Receiver<R>,
    slot: Slot<R>,
}

impl<R> TaskFuture<R> {
    /// Whether a result (or abandonment) is available without blocking
    pub fn is_ready(&mut self) -> bool {
        self.poll_slot();
        !matches!(self.slot, Slot::Pending)
    }

    /// Take the result if it is available
    ///
    /// Returns `None` while pending and after the value has been taken once.
    pub fn try_take(&mut self) -> Option<Result<R>> {
        self.poll_slot();
        match std::mem::replace(&mut self.slot, Slot::Taken) {
            Slot::Pending => {
                self.slot = Slot::Pending;
                None
            }
            Slot::Ready(value) => Some(Ok(value)),
            Slot::Abandoned => Some(Err(ChainError::Abandoned)),
            Slot::Taken => None,
        }
    }

    /// Block the calling thread until the result is available
    pub fn wait(mut self) -> Result<R> {
        match std::mem::replace(&mut self.slot, Slot::Taken) {
            Slot::Ready(value) => Ok(value),
            Slot::Abandoned | Slot::Taken => Err(ChainError::Abandoned),
            Slot::Pending => {
                futures::executor::block_on(self.receiver).map_err(|_| ChainError::Abandoned)
            }
        }
    }

    /// Block for at most `timeout`; the handle stays usable after a timeout
    ///
    /// A timeout too large to represent as a deadline waits without one.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<R> {
        if let Some(result) = self.try_take() {
            return result;
        }

        let deadline = Instant::now().checked_add(timeout);
        let backoff = Backoff::new();

        loop {
            if let Some(result) = self.try_take() {
                return result;
            }
            let remaining = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(ChainError::Timeout(timeout));
                    }
                    remaining
                }
                None => MAX_POLL_SLEEP,
            };
            if backoff.is_completed() {
                thread::sleep(MAX_POLL_SLEEP.min(remaining));
            } else {
                backoff.snooze();
            }
        }
    }

    fn poll_slot(&mut self) {
        if !matches!(self.slot, Slot::Pending) {
            return;
        }
        match self.receiver.try_recv() {
            Ok(Some(value)) => self.slot = Slot::Ready(value),
            Ok(None) => {}
            Err(oneshot::Canceled) => self.slot = Slot::Abandoned,
        }
    }
}

impl<R> Future for TaskFuture<R> {
    type Output = Result<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match std::mem::replace(&mut this.slot, Slot::Taken) {
            Slot::Ready(value) => Poll::Ready(Ok(value)),
            Slot::Abandoned | Slot::Taken => Poll::Ready(Err(ChainError::Abandoned)),
            Slot::Pending => {
                this.slot = Slot::Pending;
                match Pin::new(&mut this.receiver).poll(cx) {
                    Poll::Ready(Ok(value)) => {
                        this.slot = Slot::Taken;
                        Poll::Ready(Ok(value))
                    }
                    Poll::Ready(Err(_)) => {
                        this.slot = Slot::Taken;
                        Poll::Ready(Err(ChainError::Abandoned))
                    }
                    Poll::Pending => Poll::Pending,
                }
            }
        }
    }
}

// No field is ever pinned structurally.
impl<R> Unpin for TaskFuture<R> {}
