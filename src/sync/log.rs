//! Append-only log.

use std::fmt::{self, Debug};

use parking_lot::Mutex;

/// An append-only, ordered log.
///
/// Entries keep the order in which [`append`](SyncLog::append) calls
/// acquired the lock, so appends made sequentially from one thread are read
/// back in program order. Reads hand out clones and never mutate the log.
pub struct SyncLog<T> {
    entries: Mutex<Vec<T>>,
}

impl<T> SyncLog<T> {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append an entry to the end of the log.
    pub fn append(&self, entry: T) {
        self.entries.lock().push(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether any entry equals `expected`.
    #[must_use]
    pub fn contains(&self, expected: &T) -> bool
    where
        T: PartialEq,
    {
        self.entries.lock().contains(expected)
    }
}

impl<T: Clone> SyncLog<T> {
    /// Copy of every entry, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().clone()
    }

    /// The Nth entry (0-indexed).
    #[must_use]
    pub fn get(&self, n: usize) -> Option<T> {
        self.entries.lock().get(n).cloned()
    }

    /// The most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.entries.lock().last().cloned()
    }
}

impl<T> Default for SyncLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for SyncLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncLog")
            .field("entries", &*self.entries.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_starts_empty() {
        let log = SyncLog::<i32>::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.last().is_none());
    }

    #[test]
    fn test_log_keeps_append_order() {
        let log = SyncLog::new();
        log.append("a");
        log.append("b");
        log.append("c");

        assert_eq!(log.snapshot(), vec!["a", "b", "c"]);
        assert_eq!(log.get(1), Some("b"));
        assert_eq!(log.last(), Some("c"));
        assert!(log.get(3).is_none());
    }

    #[test]
    fn test_log_snapshot_is_detached() {
        let log = SyncLog::new();
        log.append(1);

        let snapshot = log.snapshot();
        log.append(2);

        assert_eq!(snapshot, vec![1]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_log_contains() {
        let log = SyncLog::new();
        log.append(10);
        log.append(20);

        assert!(log.contains(&10));
        assert!(!log.contains(&30));
    }

    #[test]
    fn test_log_concurrent_appends() {
        let log = Arc::new(SyncLog::new());

        let threads: Vec<_> = (0..4)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        log.append((t, i));
                    }
                })
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }

        let entries = log.snapshot();
        assert_eq!(entries.len(), 1000);

        // Each thread's own appends stay in program order.
        for t in 0..4 {
            let own: Vec<_> = entries
                .iter()
                .filter(|(thread, _)| *thread == t)
                .map(|(_, i)| *i)
                .collect();
            assert_eq!(own, (0..250).collect::<Vec<_>>());
        }
    }
}
