//! The production launcher.

use std::future::Future;

use super::{Launcher, Priority};
use crate::runtime::Spawner;

/// Launches work straight onto a runtime.
///
/// Adds nothing: no bookkeeping, no logging. Priority and work go to the
/// spawner as given, and outcomes come back through the spawner's handle.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use launch_testkit::{Launcher, Priority, TaskLauncher};
///
/// let launcher = TaskLauncher::tokio();
/// let handle = launcher.launch(Some(Priority::High), async { 1 + 1 });
/// assert_eq!(handle.await.unwrap(), 2);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskLauncher<S> {
    spawner: S,
}

impl<S: Spawner> TaskLauncher<S> {
    /// Launch onto `spawner`.
    #[must_use]
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// The underlying spawner.
    #[must_use]
    pub fn spawner(&self) -> &S {
        &self.spawner
    }
}

#[cfg(feature = "tokio")]
impl TaskLauncher<crate::runtime::TokioSpawner> {
    /// Launch onto the current Tokio runtime.
    #[must_use]
    pub fn tokio() -> Self {
        Self::new(crate::runtime::TokioSpawner::new())
    }
}

impl<S: Spawner> Launcher for TaskLauncher<S> {
    type Handle<T: Send + 'static> = S::JoinHandle<T>;

    fn launch<F>(&self, priority: Option<Priority>, work: F) -> Self::Handle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.spawner.spawn(priority, work)
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
        self.spawner.spawn_independent(priority, work)
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_task_launcher_launch() {
        let launcher = TaskLauncher::tokio();

        let handle = launcher.launch(None, async { 42 });
        assert_eq!(handle.await, Ok(42));
    }

    #[tokio::test]
    async fn test_task_launcher_passes_errors_through() {
        let launcher = TaskLauncher::tokio();

        let handle = launcher.try_launch(Some(Priority::Low), async { Err::<u8, _>("nope") });
        assert_eq!(handle.await, Ok(Err("nope")));

        let handle =
            launcher.try_launch_independent(None, async { Ok::<_, std::io::Error>("fine") });
        assert_eq!(handle.await.unwrap().unwrap(), "fine");
    }

    #[tokio::test]
    async fn test_task_launcher_reports_panics() {
        let launcher = TaskLauncher::tokio();

        let handle = launcher.launch_independent(None, async {
            panic!("task launcher panic");
        });
        assert_eq!(
            handle.await,
            Err(Error::Panicked("task launcher panic".to_string()))
        );
    }

    #[tokio::test]
    async fn test_contained_launch_inherits_span() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        let _default = tracing::subscriber::set_default(subscriber);
        let launcher = TaskLauncher::tokio();

        let current_span_name =
            || async { tracing::Span::current().metadata().map(|meta| meta.name()) };

        let (contained, independent) = {
            let span = tracing::info_span!("caller");
            let _entered = span.enter();
            (
                launcher.launch(None, current_span_name()),
                launcher.launch_independent(None, current_span_name()),
            )
        };

        assert_eq!(contained.await, Ok(Some("caller")));
        assert_eq!(independent.await, Ok(None));
    }
}
