//! Workflow tuning knobs.

use std::time::Duration;

use crate::notify::NotificationMode;

/// Lock acquisition policy for per-book critical sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockConfig {
    /// How long a single acquisition attempt may wait.
    pub acquire_timeout: Duration,
    /// How many attempts before giving up. Must be at least 1.
    pub max_attempts: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_millis(250),
            max_attempts: 4,
        }
    }
}

/// Sizing for the order read cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached orders.
    pub capacity: u64,
    /// How long a cached order stays fresh.
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            time_to_live: Duration::from_secs(3600),
        }
    }
}

/// Configuration for an [`OrderWorkflow`](crate::OrderWorkflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// When notifications are handed to the notifier.
    pub notification: NotificationMode,
    /// Per-book lock policy.
    pub lock: LockConfig,
    /// Order read cache sizing.
    pub cache: CacheConfig,
    /// How many random order ids to try before failing a placement.
    pub id_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            notification: NotificationMode::Immediate,
            lock: LockConfig::default(),
            cache: CacheConfig::default(),
            id_attempts: 4,
        }
    }
}
