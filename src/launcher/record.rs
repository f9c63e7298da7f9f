//! Launch records.

use std::fmt;

/// Advisory scheduling priority for launched work.
///
/// Ordered from least to most urgent. `None` wherever an
/// `Option<Priority>` is accepted means "use the default".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Maintenance work nobody is waiting on.
    Background,
    /// Below normal.
    Low,
    /// Normal.
    Medium,
    /// Above normal.
    High,
    /// Work a user is actively waiting for.
    UserInitiated,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Background => write!(f, "background"),
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::UserInitiated => write!(f, "user-initiated"),
        }
    }
}

/// How a piece of work was launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaunchKind {
    /// Bound to the caller's context.
    Contained,
    /// No structural parent.
    Independent,
}

impl fmt::Display for LaunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchKind::Contained => write!(f, "contained"),
            LaunchKind::Independent => write!(f, "independent"),
        }
    }
}

/// One launch call as seen by a [`RecordingLauncher`](super::RecordingLauncher).
///
/// `priority` is what the caller asked for, even when the launcher ran the
/// work at a different priority.
///
/// ```rust
/// use launch_testkit::{LaunchKind, LaunchRecord, Priority};
///
/// let record = LaunchRecord::contained(Some(Priority::High));
/// assert_eq!(record.kind, LaunchKind::Contained);
/// assert_eq!(record, LaunchRecord::contained(Some(Priority::High)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaunchRecord {
    /// Contained or independent.
    pub kind: LaunchKind,
    /// The requested priority.
    pub priority: Option<Priority>,
}

impl LaunchRecord {
    /// A record for a contained launch.
    #[must_use]
    pub fn contained(priority: Option<Priority>) -> Self {
        Self {
            kind: LaunchKind::Contained,
            priority,
        }
    }

    /// A record for an independent launch.
    #[must_use]
    pub fn independent(priority: Option<Priority>) -> Self {
        Self {
            kind: LaunchKind::Independent,
            priority,
        }
    }
}

impl fmt::Display for LaunchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.priority {
            Some(priority) => write!(f, "{} @ {}", self.kind, priority),
            None => write!(f, "{} @ default", self.kind),
        }
    }
}
