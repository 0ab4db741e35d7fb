//! Capacity-capped worker pool shared by every batch on a store.

use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Bounds how many batch items are being saved at once.
///
/// One pool lives as long as its [`BlobStore`](super::BlobStore) and all of
/// its clones, so concurrent batches compete for the same permits instead of
/// each growing its own set of workers.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a worker
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a free worker slot. The slot is released when the permit drops.
    pub(crate) async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.permits.clone().acquire_owned().await
    }
}
