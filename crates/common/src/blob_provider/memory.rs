use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{BlobProvider, BlobProviderError};
use crate::blob::{Blob, BlobId, NewBlob};

/// In-memory blob provider backed by an ordered map
#[derive(Debug, Clone)]
pub struct MemoryBlobProvider {
    inner: Arc<RwLock<MemoryBlobProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryBlobProviderInner {
    /// Live records keyed by id
    blobs: BTreeMap<BlobId, Blob>,
    /// Last id handed out; ids are never reused after a delete
    last_id: i64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryBlobProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

type MemoryResult<T> = Result<T, BlobProviderError<MemoryBlobProviderError>>;

impl MemoryBlobProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryBlobProviderInner::default())),
        }
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> MemoryResult<RwLockReadGuard<'_, MemoryBlobProviderInner>> {
        self.inner.read().map_err(|e| {
            BlobProviderError::Provider(MemoryBlobProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> MemoryResult<RwLockWriteGuard<'_, MemoryBlobProviderInner>> {
        self.inner.write().map_err(|e| {
            BlobProviderError::Provider(MemoryBlobProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryBlobProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobProvider for MemoryBlobProvider {
    type Error = MemoryBlobProviderError;

    async fn insert(&self, blob: NewBlob) -> MemoryResult<Blob> {
        let mut inner = self.write()?;

        inner.last_id += 1;
        let blob = blob.with_id(BlobId::new(inner.last_id));
        inner.blobs.insert(blob.id, blob.clone());

        Ok(blob)
    }

    async fn update(&self, blob: Blob) -> MemoryResult<Blob> {
        let mut inner = self.write()?;

        let Some(existing) = inner.blobs.get_mut(&blob.id) else {
            return Err(BlobProviderError::NotFound(blob.id));
        };
        *existing = blob.clone();

        Ok(blob)
    }

    async fn get(&self, id: BlobId) -> MemoryResult<Option<Blob>> {
        let inner = self.read()?;
        Ok(inner.blobs.get(&id).cloned())
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> MemoryResult<Vec<Blob>> {
        let inner = self.read()?;

        Ok(inner
            .blobs
            .values()
            .filter(|blob| blob.name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn list(&self) -> MemoryResult<Vec<Blob>> {
        let inner = self.read()?;
        Ok(inner.blobs.values().cloned().collect())
    }

    async fn delete(&self, id: BlobId) -> MemoryResult<bool> {
        let mut inner = self.write()?;
        Ok(inner.blobs.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[BlobId]) -> MemoryResult<u64> {
        let mut inner = self.write()?;

        let ids: HashSet<&BlobId> = ids.iter().collect();
        let mut removed = 0;
        for id in ids {
            if inner.blobs.remove(id).is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
