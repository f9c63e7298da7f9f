//! Tokio runtime integration.
//!
//! Contained tasks go to the runtime the caller is running on, or to the
//! runtime the spawner was created in when the caller is a plain thread.
//! Independent tasks go to the spawner's own runtime or, when it was built
//! with [`TokioSpawner::with_independent_runtime`], to a separate runtime
//! handle so they are not tied to the caller's runtime at all.
//!
//! Tokio has no task priorities; the priority hint is ignored.
//!
//! # Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use launch_testkit::runtime::{Spawner, TokioSpawner};
//!
//! let spawner = TokioSpawner::new();
//! let handle = spawner.spawn_independent(None, async { "done" });
//! assert_eq!(handle.await.unwrap(), "done");
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use ::tokio::runtime::Handle;
use ::tokio::task::JoinHandle;
use pin_project_lite::pin_project;
use tracing::Instrument;

use super::{Spawner, YieldFuture};
use crate::error::Error;
use crate::launcher::Priority;

/// A Tokio-based task spawner.
///
/// A spawner created inside a runtime remembers that runtime, so launches
/// made later from plain threads still land on it. Contained tasks prefer
/// the runtime the caller is currently running on.
///
/// Spawning panics only when there is neither a current runtime nor a
/// remembered one.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    /// Runtime that was current when the spawner was created.
    runtime: Option<Handle>,
    independent: Option<Handle>,
}

impl TokioSpawner {
    /// Create a new Tokio spawner, remembering the current runtime if any.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: Handle::try_current().ok(),
            independent: None,
        }
    }

    /// Send independent tasks to `handle` instead of the caller's runtime.
    #[must_use]
    pub fn with_independent_runtime(handle: Handle) -> Self {
        Self {
            independent: Some(handle),
            ..Self::new()
        }
    }

    fn contained_runtime(&self) -> Handle {
        match (Handle::try_current(), &self.runtime) {
            (Ok(current), _) => current,
            (Err(_), Some(remembered)) => remembered.clone(),
            (Err(_), None) => Handle::current(),
        }
    }

    fn independent_runtime(&self) -> Handle {
        match (&self.independent, &self.runtime) {
            (Some(independent), _) => independent.clone(),
            (None, Some(remembered)) => remembered.clone(),
            (None, None) => Handle::current(),
        }
    }
}

impl Default for TokioSpawner {
    fn default() -> Self {
        Self::new()
    }
}

pin_project! {
    /// Join handle for Tokio tasks.
    ///
    /// Resolves to the task's output, or to an [`Error`] when the task
    /// panicked or was cancelled by the runtime.
    pub struct TokioJoinHandle<T> {
        #[pin]
        inner: JoinHandle<T>,
    }
}

impl<T> TokioJoinHandle<T> {
    /// Check if the task is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> Future for TokioJoinHandle<T> {
    type Output = crate::Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().inner.poll(cx).map(|result| {
            result.map_err(|err| {
                if err.is_panic() {
                    Error::from_panic(err.into_panic())
                } else {
                    Error::Cancelled
                }
            })
        })
    }
}

impl Spawner for TokioSpawner {
    type JoinHandle<T: Send + 'static> = TokioJoinHandle<T>;

    fn spawn<F>(&self, _priority: Option<Priority>, future: F) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        TokioJoinHandle {
            inner: self.contained_runtime().spawn(future.in_current_span()),
        }
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
        TokioJoinHandle {
            inner: self.independent_runtime().spawn(future),
        }
    }

    fn yield_now(&self) -> YieldFuture {
        Box::pin(::tokio::task::yield_now())
    }
}
