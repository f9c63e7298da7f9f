//! async-std runtime integration.
//!
//! async-std has no priorities and a single global executor, so contained
//! and independent tasks differ only in whether the caller's tracing span
//! follows them. Panics are caught inside the task and surfaced through the
//! handle.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use pin_project_lite::pin_project;
use tracing::Instrument;

use super::{Spawner, YieldFuture};
use crate::error::Error;
use crate::launcher::Priority;

/// An async-std-based task spawner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncStdSpawner;

impl AsyncStdSpawner {
    /// Create a new async-std spawner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

pin_project! {
    /// Join handle for async-std tasks.
    pub struct AsyncStdJoinHandle<T> {
        #[pin]
        inner: ::async_std::task::JoinHandle<std::thread::Result<T>>,
    }
}

impl<T> Future for AsyncStdJoinHandle<T> {
    type Output = crate::Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project()
            .inner
            .poll(cx)
            .map(|result| result.map_err(Error::from_panic))
    }
}

fn spawn_catching<F>(future: F) -> AsyncStdJoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    AsyncStdJoinHandle {
        inner: ::async_std::task::spawn(AssertUnwindSafe(future).catch_unwind()),
    }
}

impl Spawner for AsyncStdSpawner {
    type JoinHandle<T: Send + 'static> = AsyncStdJoinHandle<T>;

    fn spawn<F>(&self, _priority: Option<Priority>, future: F) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        spawn_catching(future.in_current_span())
    }

    fn spawn_independent<F>(
        &self,
        _priority: Option<Priority>,
        future: F,
    ) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        spawn_catching(future)
    }

    fn yield_now(&self) -> YieldFuture {
        Box::pin(::async_std::task::yield_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{LaunchRecord, Launcher, RecordingConfig, RecordingLauncher};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[async_std::test]
    async fn test_async_std_spawner() {
        let spawner = AsyncStdSpawner::new();

        let handle = spawner.spawn(None, async { 42 });
        assert_eq!(handle.await, Ok(42));
    }

    #[async_std::test]
    async fn test_async_std_panic_is_reported() {
        let spawner = AsyncStdSpawner::new();

        let handle = spawner.spawn_independent(Some(Priority::Low), async {
            panic!("async-std boom");
        });

        assert_eq!(
            handle.await,
            Err(Error::Panicked("async-std boom".to_string()))
        );
    }

    #[async_std::test]
    async fn test_async_std_recording_launcher_join() {
        let launcher = RecordingLauncher::new(AsyncStdSpawner::new());
        let total = Arc::new(AtomicUsize::new(0));

        for i in 1..=3 {
            let total = Arc::clone(&total);
            launcher.launch(None, async move {
                ::async_std::task::yield_now().await;
                total.fetch_add(i, Ordering::SeqCst);
            });
        }
        let failed = launcher.try_launch_independent(None, async { Err::<(), _>("refused") });

        launcher.join().await;

        assert_eq!(total.load(Ordering::SeqCst), 6);
        assert_eq!(launcher.completed(), 4);
        assert_eq!(launcher.last_call(), Some(LaunchRecord::independent(None)));
        assert_eq!(failed.await, Ok(Err("refused")));
    }

    #[async_std::test]
    async fn test_async_std_yield_join_counts_panics() {
        let config = RecordingConfig::new().yield_join();
        let launcher = RecordingLauncher::with_config(AsyncStdSpawner::new(), config);

        let handle = launcher.launch(None, async {
            panic!("async-std recording boom");
        });
        launcher.join().await;

        assert!(launcher.is_settled());
        assert_eq!(launcher.completed(), 1);
        assert!(handle.await.unwrap_err().is_panic());
    }
}
