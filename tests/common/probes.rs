use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Ordered log of side effects observed by steps
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events.lock().iter().any(|e| e == event)
    }
}

/// Last value written by a step
#[derive(Debug)]
pub struct Probe<T> {
    value: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Probe<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Clone> Probe<T> {
    pub fn new() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = Some(value);
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().clone()
    }
}

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
