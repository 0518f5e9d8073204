// src/progress/locks.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per learner.
///
/// A ledger update is load, credit, then two saves. Holding the learner's
/// guard across all of it keeps concurrent requests from interleaving.
#[derive(Debug, Clone, Default)]
pub struct LearnerLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl LearnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `learner_id`'s ledger.
    pub async fn lock(&self, learner_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(learner_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Learners with a held or awaited lock.
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
