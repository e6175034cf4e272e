//! Keyed async locks for per-entity critical sections.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::config::LockConfig;

/// Error returned when a lock cannot be acquired in time.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("lock acquisition timed out after {attempts} attempts")]
pub struct LockContended {
    /// How many acquisition attempts were made.
    pub attempts: u32,
}

/// A registry of async mutexes, one per key.
///
/// Serializes read-modify-write sequences on a single entity (one book's
/// stock) without blocking work on unrelated keys. Entries are created on
/// first use and kept for the life of the registry; the key space is bounded
/// by the catalog, so there is no eviction.
pub struct KeyedLocks<K> {
    entries: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    config: LockConfig,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Create a registry with the given acquisition policy.
    #[must_use]
    pub fn new(config: LockConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Acquire the lock for `key`, waiting up to the configured timeout on
    /// each attempt. The returned guard releases the lock on drop.
    ///
    /// # Errors
    ///
    /// Returns [`LockContended`] when every attempt timed out.
    pub async fn acquire(&self, key: &K) -> Result<OwnedMutexGuard<()>, LockContended> {
        let slot = self.slot(key).await;

        for attempt in 1..=self.config.max_attempts {
            match tokio::time::timeout(
                self.config.acquire_timeout,
                Arc::clone(&slot).lock_owned(),
            )
            .await
            {
                Ok(guard) => return Ok(guard),
                Err(_elapsed) => debug!(attempt, "lock attempt timed out"),
            }
        }

        Err(LockContended {
            attempts: self.config.max_attempts,
        })
    }

    async fn slot(&self, key: &K) -> Arc<Mutex<()>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(
            entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
