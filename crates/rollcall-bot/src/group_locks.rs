use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rollcall_shared::GroupId;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Debug)]
struct GroupLock {
    lock: Arc<Mutex<()>>,
    last_used: Instant,
}

/// One async mutex per effective group.
///
/// Handlers hold the guard for their whole run, so updates for the same
/// group are applied one at a time while other groups proceed in parallel.
#[derive(Clone, Default)]
pub struct GroupLocks {
    locks: Arc<Mutex<HashMap<GroupId, GroupLock>>>,
}

impl GroupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `group`.
    pub async fn acquire(&self, group: GroupId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            let entry = locks.entry(group).or_insert_with(|| GroupLock {
                lock: Arc::new(Mutex::new(())),
                last_used: Instant::now(),
            });
            entry.last_used = Instant::now();
            entry.lock.clone()
        };
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits on that were idle for `max_idle`.
    pub async fn purge_idle(&self, max_idle: Duration) {
        let mut locks = self.locks.lock().await;
        let before = locks.len();
        let now = Instant::now();
        locks.retain(|_, entry| {
            Arc::strong_count(&entry.lock) > 1 || now.duration_since(entry.last_used) < max_idle
        });
        let purged = before - locks.len();
        if purged > 0 {
            debug!(purged, remaining = locks.len(), "Purged idle group locks");
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
