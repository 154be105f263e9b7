// In-flight request counter
//
// Drives the full-screen loading indicator. Every backend call holds a
// `LoadingGuard` for its whole duration, so the count drops back even when
// the call fails or its future is dropped halfway.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared count of backend requests currently in flight.
///
/// Cheaply cloneable; all clones observe the same value. The count never
/// goes below zero, whatever the order of increments and decrements.
#[derive(Debug, Clone)]
pub struct LoadingCounter {
    tx: Arc<watch::Sender<usize>>,
}

impl LoadingCounter {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Mark one request as started.
    pub fn increment(&self) {
        self.tx.send_modify(|count| *count = count.saturating_add(1));
    }

    /// Mark one request as finished. Clamped at zero.
    pub fn decrement(&self) {
        self.tx.send_modify(|count| *count = count.saturating_sub(1));
    }

    /// Increment now, decrement when the returned guard is dropped.
    pub fn begin(&self) -> LoadingGuard {
        self.increment();
        LoadingGuard {
            counter: self.clone(),
        }
    }

    pub fn count(&self) -> usize {
        *self.tx.borrow()
    }

    /// Whether the loading indicator should be visible.
    pub fn is_loading(&self) -> bool {
        self.count() > 0
    }

    /// Subscribe to count changes.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }
}

impl Default for LoadingCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle for one in-flight request.
#[derive(Debug)]
#[must_use = "the request is only counted while the guard is alive"]
pub struct LoadingGuard {
    counter: LoadingCounter,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}
