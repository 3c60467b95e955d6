//! In-process per-pair mutual exclusion
//!
//! Votes on the same pair are serialized here before they reach the
//! database, so concurrent requests queue on a cheap async mutex instead of
//! contending for the database write lock. Votes on different pairs never
//! wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Dead entries are swept once the map grows past this many pairs
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Default)]
pub struct PairLocks {
    locks: Mutex<HashMap<Uuid, Weak<AsyncMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a pair; released when the guard drops
    pub async fn acquire(&self, pair_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

            if locks.len() >= PRUNE_THRESHOLD {
                locks.retain(|_, lock| lock.strong_count() > 0);
            }

            match locks.get(&pair_id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(AsyncMutex::new(()));
                    locks.insert(pair_id, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        lock.lock_owned().await
    }

    /// Number of pairs with a live lock (held or awaited)
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }
}
