//! Synchronized cells shared between launching code, background tasks and
//! joiners.
//!
//! - [`Counter`] - lock-free monotonic counter
//! - [`SyncLog`] - append-only log with snapshot reads
//!
//! Both are safe to touch from any number of threads at once. Neither holds
//! a lock across a call into user code, so a completion that races a join
//! poll on the same cell cannot deadlock.

mod counter;
mod log;

pub use counter::Counter;
pub use log::SyncLog;
