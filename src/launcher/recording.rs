//! The recording launcher used by tests.
//!
//! Each launch is logged and counted as in flight. The work is wrapped so
//! that finishing it, by returning, panicking or being dropped by the
//! runtime, counts it as completed exactly once. [`RecordingLauncher::join`]
//! waits until the two counts meet.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{ready, Context, Poll, Waker};

use parking_lot::{Mutex, RwLock};
use pin_project_lite::pin_project;
use tracing::{debug, trace};

use super::{JoinStrategy, LaunchKind, LaunchRecord, Launcher, Priority, RecordingConfig};
use crate::runtime::{Spawner, YieldFuture};
use crate::sync::{Counter, SyncLog};

/// Bookkeeping shared by a launcher, its clones and its in-flight work.
#[derive(Default)]
struct LaunchState {
    /// Held shared by launches and exclusively while the join predicate is
    /// read, so a launch's append and increment are seen together or not
    /// at all.
    gate: RwLock<()>,
    calls: SyncLog<LaunchRecord>,
    in_flight: Counter,
    completed: Counter,
    /// Joiners parked under [`JoinStrategy::Notify`].
    waiters: Mutex<Vec<Waker>>,
}

impl LaunchState {
    /// Log a launch and count it in flight. Returns the new in-flight count.
    fn record(&self, record: LaunchRecord) -> usize {
        let _gate = self.gate.read();
        self.calls.append(record);
        self.in_flight.increment()
    }

    fn complete(&self) {
        let completed = self.completed.increment();
        trace!(completed, "background work completed");

        let waiters = std::mem::take(&mut *self.waiters.lock());
        for waker in waiters {
            waker.wake();
        }
    }

    /// `(in_flight, completed)`, read consistently.
    fn counts(&self) -> (usize, usize) {
        let _gate = self.gate.write();
        // Completed first: it can only trail in-flight, never overtake it.
        let completed = self.completed.get();
        let in_flight = self.in_flight.get();
        (in_flight, completed)
    }

    fn is_settled(&self) -> bool {
        let (in_flight, completed) = self.counts();
        in_flight == completed
    }

    fn park(&self, waker: &Waker) {
        let mut waiters = self.waiters.lock();
        if !waiters.iter().any(|w| w.will_wake(waker)) {
            waiters.push(waker.clone());
        }
    }
}

/// Counts the owning work as completed, once, when fired or dropped.
///
/// Holds only a weak reference so outstanding work never keeps a dropped
/// launcher's state alive.
struct CompletionGuard {
    state: Option<Weak<LaunchState>>,
}

impl CompletionGuard {
    fn new(state: &Arc<LaunchState>) -> Self {
        Self {
            state: Some(Arc::downgrade(state)),
        }
    }

    fn fire(&mut self) {
        if let Some(state) = self.state.take().and_then(|weak| weak.upgrade()) {
            state.complete();
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.fire();
    }
}

pin_project! {
    /// Work wrapped with its completion guard.
    struct Tracked<F> {
        #[pin]
        work: F,
        guard: CompletionGuard,
    }
}

impl<F: Future> Future for Tracked<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let output = ready!(this.work.poll(cx));
        this.guard.fire();
        Poll::Ready(output)
    }
}

/// A [`Launcher`] that records every launch and can wait for all of them.
///
/// Clones share the same log and counters.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use launch_testkit::{LaunchRecord, Launcher, Priority, RecordingLauncher};
///
/// let launcher = RecordingLauncher::tokio();
///
/// launcher.launch(Some(Priority::High), async {});
/// launcher.launch_independent(None, async {});
///
/// launcher.join().await;
///
/// assert_eq!(
///     launcher.calls(),
///     vec![
///         LaunchRecord::contained(Some(Priority::High)),
///         LaunchRecord::independent(None),
///     ]
/// );
/// assert_eq!(launcher.completed(), 2);
/// # }
/// ```
pub struct RecordingLauncher<S> {
    spawner: S,
    state: Arc<LaunchState>,
    config: RecordingConfig,
}

impl<S: Spawner> RecordingLauncher<S> {
    /// Record launches made through `spawner`.
    #[must_use]
    pub fn new(spawner: S) -> Self {
        Self::with_config(spawner, RecordingConfig::default())
    }

    /// Record launches made through `spawner`, configured by `config`.
    #[must_use]
    pub fn with_config(spawner: S, config: RecordingConfig) -> Self {
        Self {
            spawner,
            state: Arc::new(LaunchState::default()),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    /// Wait until every launch made so far has completed.
    ///
    /// Resolves immediately when nothing is outstanding, so calling it again
    /// without new launches is free. Waiting never blocks a thread: the
    /// joining task is parked (or yields, under [`JoinStrategy::Yield`]) and
    /// the runtime stays free to run the work being waited on.
    ///
    /// There is no timeout. If some work never finishes, neither does
    /// `join`; wrap it in your runtime's timeout when that matters:
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use std::time::Duration;
    /// use launch_testkit::{Launcher, RecordingLauncher};
    ///
    /// let launcher = RecordingLauncher::tokio();
    /// launcher.launch(None, std::future::pending::<()>());
    ///
    /// let waited = tokio::time::timeout(Duration::from_millis(10), launcher.join()).await;
    /// assert!(waited.is_err());
    /// # }
    /// ```
    pub fn join(&self) -> JoinFuture<'_, S> {
        JoinFuture {
            launcher: self,
            yielding: None,
            announced: false,
        }
    }

    fn launch_tracked<F>(
        &self,
        kind: LaunchKind,
        priority: Option<Priority>,
        work: F,
    ) -> S::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let in_flight = self.state.record(LaunchRecord { kind, priority });
        let effective = self.config.effective_priority(priority);
        trace!(
            %kind,
            requested = ?priority,
            effective = ?effective,
            in_flight,
            "launching background work"
        );

        let tracked = Tracked {
            work,
            guard: CompletionGuard::new(&self.state),
        };
        match kind {
            LaunchKind::Contained => self.spawner.spawn(effective, tracked),
            LaunchKind::Independent => self.spawner.spawn_independent(effective, tracked),
        }
    }
}

impl<S> RecordingLauncher<S> {
    /// Every launch so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<LaunchRecord> {
        self.state.calls.snapshot()
    }

    /// Number of launches so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.calls.len()
    }

    /// Check if anything was launched.
    #[must_use]
    pub fn was_called(&self) -> bool {
        !self.state.calls.is_empty()
    }

    /// Check if exactly `n` launches were made.
    #[must_use]
    pub fn was_called_times(&self, n: usize) -> bool {
        self.call_count() == n
    }

    /// Check if any launch matches `expected`.
    #[must_use]
    pub fn was_called_with(&self, expected: &LaunchRecord) -> bool {
        self.state.calls.contains(expected)
    }

    /// Get the Nth launch (0-indexed).
    #[must_use]
    pub fn nth_call(&self, n: usize) -> Option<LaunchRecord> {
        self.state.calls.get(n)
    }

    /// Get the most recent launch.
    #[must_use]
    pub fn last_call(&self) -> Option<LaunchRecord> {
        self.state.calls.last()
    }

    /// Launches counted so far.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.counts().0
    }

    /// Launched work that has finished.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.state.counts().1
    }

    /// Launched work that has not finished yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        let (in_flight, completed) = self.state.counts();
        in_flight - completed
    }

    /// Check if all launched work has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state.is_settled()
    }
}

#[cfg(feature = "tokio")]
impl RecordingLauncher<crate::runtime::TokioSpawner> {
    /// Record launches onto the current Tokio runtime.
    #[must_use]
    pub fn tokio() -> Self {
        Self::new(crate::runtime::TokioSpawner::new())
    }
}

impl<S: Spawner + Default> Default for RecordingLauncher<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone> Clone for RecordingLauncher<S> {
    fn clone(&self) -> Self {
        Self {
            spawner: self.spawner.clone(),
            state: Arc::clone(&self.state),
            config: self.config.clone(),
        }
    }
}

impl<S> fmt::Debug for RecordingLauncher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (in_flight, completed) = self.state.counts();
        f.debug_struct("RecordingLauncher")
            .field("calls", &self.state.calls)
            .field("in_flight", &in_flight)
            .field("completed", &completed)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Spawner> Launcher for RecordingLauncher<S> {
    type Handle<T: Send + 'static> = S::JoinHandle<T>;

    fn launch<F>(&self, priority: Option<Priority>, work: F) -> Self::Handle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.launch_tracked(LaunchKind::Contained, priority, work)
    }

    fn launch_independent<F>(
        &self,
        priority: Option<Priority>,
        work: F,
    ) -> Self::Handle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.launch_tracked(LaunchKind::Independent, priority, work)
    }
}

/// Future returned by [`RecordingLauncher::join`].
#[must_use = "futures do nothing unless polled"]
pub struct JoinFuture<'a, S> {
    launcher: &'a RecordingLauncher<S>,
    yielding: Option<YieldFuture>,
    announced: bool,
}

impl<S: Spawner> Future for JoinFuture<'_, S> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let launcher = self.launcher;
        let state = &launcher.state;

        loop {
            if let Some(yielding) = self.yielding.as_mut() {
                ready!(yielding.as_mut().poll(cx));
                self.yielding = None;
            }

            if state.is_settled() {
                if self.announced {
                    debug!("background work settled");
                }
                return Poll::Ready(());
            }

            if !self.announced {
                self.announced = true;
                let (in_flight, completed) = state.counts();
                debug!(in_flight, completed, "joining outstanding background work");
            }

            match launcher.config.join_strategy {
                JoinStrategy::Notify => {
                    state.park(cx.waker());
                    // A completion may have landed before the waker was parked.
                    if state.is_settled() {
                        continue;
                    }
                    return Poll::Pending;
                }
                JoinStrategy::Yield => {
                    self.yielding = Some(launcher.spawner.yield_now());
                }
            }
        }
    }
}
