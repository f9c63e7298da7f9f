//! Launching background work.
//!
//! Code that fires off background work takes a [`Launcher`] instead of
//! calling a runtime's spawn function. Production wires in a
//! [`TaskLauncher`]; tests wire in a [`RecordingLauncher`] and await
//! [`RecordingLauncher::join`] before asserting on what the work did.
//!
//! # Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! use launch_testkit::{Launcher, RecordingLauncher};
//!
//! fn refresh_in_background(launcher: &impl Launcher, done: Arc<AtomicBool>) {
//!     launcher.launch(None, async move {
//!         done.store(true, Ordering::SeqCst);
//!     });
//! }
//!
//! let launcher = RecordingLauncher::tokio();
//! let done = Arc::new(AtomicBool::new(false));
//!
//! refresh_in_background(&launcher, done.clone());
//! launcher.join().await;
//!
//! assert!(done.load(Ordering::SeqCst));
//! # }
//! ```

use std::future::Future;

mod config;
mod record;
mod recording;
mod task;

pub use config::{JoinStrategy, PriorityPolicy, RecordingConfig};
pub use record::{LaunchKind, LaunchRecord, Priority};
pub use recording::{JoinFuture, RecordingLauncher};
pub use task::TaskLauncher;

/// Something that can start background work.
///
/// Every method returns immediately with a handle; the work may not have
/// started yet. Awaiting the handle yields the work's output exactly as it
/// produced it. Dropping the handle does not cancel the work.
///
/// `priority` is advisory.
pub trait Launcher: Send + Sync {
    /// Handle to the outcome of launched work.
    type Handle<T: Send + 'static>: Future<Output = crate::Result<T>> + Send + 'static;

    /// Launch work bound to the caller's context.
    fn launch<F>(&self, priority: Option<Priority>, work: F) -> Self::Handle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Launch work with no structural parent.
    fn launch_independent<F>(
        &self,
        priority: Option<Priority>,
        work: F,
    ) -> Self::Handle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Launch fallible work bound to the caller's context.
    ///
    /// The work's `Err` comes back through the handle as `Ok(Err(e))`.
    fn try_launch<F, T, E>(
        &self,
        priority: Option<Priority>,
        work: F,
    ) -> Self::Handle<Result<T, E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.launch(priority, work)
    }

    /// Launch fallible work with no structural parent.
    fn try_launch_independent<F, T, E>(
        &self,
        priority: Option<Priority>,
        work: F,
    ) -> Self::Handle<Result<T, E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.launch_independent(priority, work)
    }
}
