use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Serializes units of work per task inside one process.
///
/// Work on different tasks never contends. Entries are dropped from the map
/// once nobody holds or waits on them.
#[derive(Debug, Default)]
pub struct TaskLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl TaskLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, task_id: Uuid) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(map.entry(task_id).or_default())
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
