//! Configuration for [`RecordingLauncher`](super::RecordingLauncher).

use super::Priority;

/// Which priority a recording launcher hands to the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriorityPolicy {
    /// Run everything at the configured neutral priority.
    ///
    /// Join accounting does not depend on scheduling class, so tests run
    /// all work alike. The requested priority is still recorded.
    #[default]
    Neutral,
    /// Pass the requested priority through unchanged.
    Forward,
}

/// How [`join`](super::RecordingLauncher::join) waits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinStrategy {
    /// Park the joining task until a completion wakes it.
    #[default]
    Notify,
    /// Yield to the runtime and re-check on every poll.
    Yield,
}

/// Configuration for a recording launcher.
///
/// # Example
///
/// ```rust
/// use launch_testkit::{JoinStrategy, Priority, PriorityPolicy, RecordingConfig};
///
/// let config = RecordingConfig::new()
///     .neutral_priority(Priority::Medium)
///     .yield_join();
///
/// assert_eq!(config.priority_policy, PriorityPolicy::Neutral);
/// assert_eq!(config.join_strategy, JoinStrategy::Yield);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingConfig {
    /// Which priority reaches the runtime.
    pub priority_policy: PriorityPolicy,
    /// Priority used under [`PriorityPolicy::Neutral`].
    pub neutral_priority: Option<Priority>,
    /// How `join` waits.
    pub join_strategy: JoinStrategy,
}

impl RecordingConfig {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward requested priorities to the runtime.
    #[must_use]
    pub fn forward_priority(mut self) -> Self {
        self.priority_policy = PriorityPolicy::Forward;
        self
    }

    /// Set the priority substituted under [`PriorityPolicy::Neutral`].
    #[must_use]
    pub fn neutral_priority(mut self, priority: Priority) -> Self {
        self.neutral_priority = Some(priority);
        self
    }

    /// Wait in `join` by yielding and re-checking.
    #[must_use]
    pub fn yield_join(mut self) -> Self {
        self.join_strategy = JoinStrategy::Yield;
        self
    }

    /// The priority that reaches the runtime for a `requested` priority.
    #[must_use]
    pub fn effective_priority(&self, requested: Option<Priority>) -> Option<Priority> {
        match self.priority_policy {
            PriorityPolicy::Neutral => self.neutral_priority,
            PriorityPolicy::Forward => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_config_default() {
        let config = RecordingConfig::default();

        assert_eq!(config.priority_policy, PriorityPolicy::Neutral);
        assert_eq!(config.neutral_priority, None);
        assert_eq!(config.join_strategy, JoinStrategy::Notify);
    }

    #[test]
    fn test_recording_config_builder() {
        let config = RecordingConfig::new()
            .forward_priority()
            .neutral_priority(Priority::Low)
            .yield_join();

        assert_eq!(config.priority_policy, PriorityPolicy::Forward);
        assert_eq!(config.neutral_priority, Some(Priority::Low));
        assert_eq!(config.join_strategy, JoinStrategy::Yield);
    }

    #[test]
    fn test_effective_priority_neutral() {
        let config = RecordingConfig::new().neutral_priority(Priority::Medium);

        assert_eq!(
            config.effective_priority(Some(Priority::UserInitiated)),
            Some(Priority::Medium)
        );
        assert_eq!(config.effective_priority(None), Some(Priority::Medium));
    }

    #[test]
    fn test_effective_priority_forward() {
        let config = RecordingConfig::new().forward_priority();

        assert_eq!(
            config.effective_priority(Some(Priority::High)),
            Some(Priority::High)
        );
        assert_eq!(config.effective_priority(None), None);
    }
}
