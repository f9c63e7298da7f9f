//! smol runtime integration.
//!
//! A `smol::Task` cancels its future when dropped, which would turn every
//! fire-and-forget launch into a no-op. [`SmolJoinHandle`] detaches the task
//! instead, so dropping the handle leaves the work running.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::FutureExt;
use tracing::Instrument;

use super::{Spawner, YieldFuture};
use crate::error::Error;
use crate::launcher::Priority;

/// A smol-based task spawner using the global executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmolSpawner;

impl SmolSpawner {
    /// Create a new smol spawner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Join handle for smol tasks.
pub struct SmolJoinHandle<T> {
    inner: Option<::smol::Task<std::thread::Result<T>>>,
}

impl<T> Future for SmolJoinHandle<T> {
    type Output = crate::Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(task) = self.inner.as_mut() else {
            return Poll::Ready(Err(Error::Cancelled));
        };
        let result = ready!(Pin::new(task).poll(cx));
        self.inner = None;
        Poll::Ready(result.map_err(Error::from_panic))
    }
}

impl<T> Drop for SmolJoinHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = self.inner.take() {
            task.detach();
        }
    }
}

fn spawn_catching<F>(future: F) -> SmolJoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    SmolJoinHandle {
        inner: Some(::smol::spawn(AssertUnwindSafe(future).catch_unwind())),
    }
}

impl Spawner for SmolSpawner {
    type JoinHandle<T: Send + 'static> = SmolJoinHandle<T>;

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
        Box::pin(::smol::future::yield_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{LaunchRecord, Launcher, RecordingConfig, RecordingLauncher};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_smol_spawner() {
        ::smol::block_on(async {
            let spawner = SmolSpawner::new();

            let handle = spawner.spawn(None, async { 42 });
            assert_eq!(handle.await, Ok(42));
        });
    }

    #[test]
    fn test_smol_dropped_handle_keeps_running() {
        ::smol::block_on(async {
            let spawner = SmolSpawner::new();
            let (tx, rx) = futures::channel::oneshot::channel();

            drop(spawner.spawn_independent(None, async move {
                tx.send(3).unwrap();
            }));

            assert_eq!(rx.await, Ok(3));
        });
    }

    #[test]
    fn test_smol_panic_is_reported() {
        ::smol::block_on(async {
            let spawner = SmolSpawner::new();

            let handle = spawner.spawn(None, async {
                panic!("smol boom");
            });

            assert_eq!(handle.await, Err(Error::Panicked("smol boom".to_string())));
        });
    }

    #[test]
    fn test_smol_recording_launcher_join() {
        ::smol::block_on(async {
            let launcher = RecordingLauncher::new(SmolSpawner::new());
            let flag = Arc::new(AtomicBool::new(false));

            let flag_in_task = Arc::clone(&flag);
            launcher.launch(None, async move {
                flag_in_task.store(true, Ordering::SeqCst);
            });
            launcher.launch_independent(None, async {});
            launcher.join().await;

            assert!(flag.load(Ordering::SeqCst));
            assert_eq!(launcher.completed(), 2);
            assert_eq!(
                launcher.calls(),
                vec![LaunchRecord::contained(None), LaunchRecord::independent(None)]
            );
        });
    }

    #[test]
    fn test_smol_yield_join() {
        ::smol::block_on(async {
            let config = RecordingConfig::new().yield_join();
            let launcher = RecordingLauncher::with_config(SmolSpawner::new(), config);

            for _ in 0..5 {
                launcher.launch_independent(None, async {
                    ::smol::future::yield_now().await;
                });
            }
            launcher.join().await;

            assert!(launcher.is_settled());
            assert_eq!(launcher.completed(), 5);
        });
    }
}
