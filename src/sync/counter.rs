//! Monotonic counter.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A monotonically increasing counter.
///
/// All operations use `SeqCst`, so an increment made on one thread is
/// visible to every later [`get`](Counter::get) on any other thread.
///
/// # Example
///
/// ```rust
/// use launch_testkit::sync::Counter;
///
/// let counter = Counter::new();
/// assert_eq!(counter.increment(), 1);
/// assert_eq!(counter.increment(), 2);
/// assert_eq!(counter.get(), 2);
/// ```
#[derive(Default)]
pub struct Counter {
    value: AtomicUsize,
}

impl Counter {
    /// Create a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one and return the new value.
    pub fn increment(&self) -> usize {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Read the current value.
    #[must_use]
    pub fn get(&self) -> usize {
        self.value.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Counter").field(&self.get()).finish()
    }
}
