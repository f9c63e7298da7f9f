//! # launch-testkit
//!
//! > Fire-and-forget background work you can actually test
//!
//! Code that starts background work from a synchronous call site usually
//! gives tests nothing to wait on: the work finishes "eventually", and the
//! test either sleeps or flakes. **launch-testkit** puts a [`Launcher`]
//! between that code and the runtime.
//!
//! - [`TaskLauncher`] - production launcher, a straight pass-through to the runtime
//! - [`RecordingLauncher`] - test launcher that logs every launch and can
//!   [`join`](RecordingLauncher::join) all outstanding work
//!
//! ## Quick Start
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use launch_testkit::prelude::*;
//!
//! struct Indexer<L> {
//!     launcher: L,
//!     indexed: Arc<AtomicUsize>,
//! }
//!
//! impl<L: Launcher> Indexer<L> {
//!     fn submit(&self, docs: usize) {
//!         let indexed = Arc::clone(&self.indexed);
//!         self.launcher.launch(Some(Priority::Background), async move {
//!             indexed.fetch_add(docs, Ordering::SeqCst);
//!         });
//!     }
//! }
//!
//! let indexer = Indexer {
//!     launcher: RecordingLauncher::tokio(),
//!     indexed: Arc::new(AtomicUsize::new(0)),
//! };
//!
//! indexer.submit(3);
//! indexer.submit(4);
//! indexer.launcher.join().await;
//!
//! assert_eq!(indexer.indexed.load(Ordering::SeqCst), 7);
//! assert_eq!(indexer.launcher.call_count(), 2);
//! # }
//! ```
//!
//! ## Runtimes
//!
//! Spawning goes through [`runtime::Spawner`]. Tokio is enabled by default;
//! async-std and smol are available behind the `async-std` and `smol`
//! features.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod launcher;
pub mod runtime;
pub mod sync;

/// Prelude for convenient imports
///
/// ```rust
/// use launch_testkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::launcher::{
        JoinStrategy, LaunchKind, LaunchRecord, Launcher, Priority, PriorityPolicy,
        RecordingConfig, RecordingLauncher, TaskLauncher,
    };
    pub use crate::runtime::Spawner;
}

// Re-exports
pub use error::{Error, Result};
pub use launcher::{
    JoinFuture, JoinStrategy, LaunchKind, LaunchRecord, Launcher, Priority, PriorityPolicy,
    RecordingConfig, RecordingLauncher, TaskLauncher,
};

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use launch_testkit_macros::test;
