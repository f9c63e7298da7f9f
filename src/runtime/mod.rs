//! Runtime-agnostic task spawning.
//!
//! Launchers never talk to an executor directly. They go through
//! [`Spawner`], which is the only place a concrete runtime is named. An
//! adapter is provided for each supported runtime behind a cargo feature:
//!
//! - `TokioSpawner` (`tokio`, default)
//! - `AsyncStdSpawner` (`async-std`)
//! - `SmolSpawner` (`smol`)
//!
//! Every adapter reports a panicking task as
//! [`Error::Panicked`](crate::Error::Panicked) through its join handle, so
//! callers see the same outcome shape on every runtime.
//!
//! # Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use launch_testkit::runtime::{Spawner, TokioSpawner};
//!
//! let spawner = TokioSpawner::new();
//! let handle = spawner.spawn(None, async { 21 * 2 });
//! assert_eq!(handle.await.unwrap(), 42);
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::launcher::Priority;

/// A boxed future returned by [`Spawner::yield_now`].
pub type YieldFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A spawner for async tasks.
///
/// Implementations hand the future to a runtime and return at once; the
/// future must not be polled on the calling thread before `spawn` returns.
pub trait Spawner: Send + Sync + 'static {
    /// The join handle type for spawned tasks.
    ///
    /// Dropping a handle detaches the task; it keeps running.
    type JoinHandle<T: Send + 'static>: Future<Output = crate::Result<T>> + Send + 'static;

    /// Spawn a task bound to the caller's context.
    ///
    /// The caller's current tracing span is carried into the task.
    /// `priority` is a hint; runtimes without priorities ignore it.
    fn spawn<F>(&self, priority: Option<Priority>, future: F) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Spawn a task with no structural parent.
    fn spawn_independent<F>(
        &self,
        priority: Option<Priority>,
        future: F,
    ) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Give up the current scheduling turn once.
    fn yield_now(&self) -> YieldFuture;
}

#[cfg(feature = "tokio")]
pub mod tokio;

#[cfg(feature = "async-std")]
pub mod async_std;

#[cfg(feature = "smol")]
pub mod smol;

#[cfg(feature = "tokio")]
pub use self::tokio::{TokioJoinHandle, TokioSpawner};

#[cfg(feature = "async-std")]
pub use self::async_std::{AsyncStdJoinHandle, AsyncStdSpawner};

#[cfg(feature = "smol")]
pub use self::smol::{SmolJoinHandle, SmolSpawner};
