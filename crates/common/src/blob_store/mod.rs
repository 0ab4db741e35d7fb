//! Orchestration layer over a [`BlobProvider`].
//!
//! Single-item operations run inline on the caller's task. Batch adds fan
//! out across a [`JoinSet`], one task per item, with parallelism bounded by
//! a [`WorkerPool`] shared by every clone of the store.

mod config;
mod error;
mod pool;

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinSet;
use tracing::{error, info, trace, warn, Instrument, Span};

use crate::blob::{Blob, BlobId, NewBlob};
use crate::blob_provider::{BlobProvider, BlobProviderError};

pub use config::{BlobStoreConfig, DEFAULT_MAX_BATCH_WORKERS, MAX_BATCH_WORKERS_LIMIT};
pub use error::{BatchError, BatchItemFailure, BlobStoreConfigError, BlobStoreError, StorageError};
pub use pool::WorkerPool;

#[derive(Debug, Clone)]
pub struct BlobStore<P: BlobProvider> {
    provider: P,
    pool: WorkerPool,
    config: BlobStoreConfig,
}

impl<P: BlobProvider> BlobStore<P> {
    /// Create a store with the default configuration
    pub fn new(provider: P) -> Self {
        let config = BlobStoreConfig::default();
        Self {
            provider,
            pool: WorkerPool::new(config.max_batch_workers),
            config,
        }
    }

    pub fn with_config(provider: P, config: BlobStoreConfig) -> Result<Self, BlobStoreConfigError> {
        config.validate()?;
        Ok(Self {
            provider,
            pool: WorkerPool::new(config.max_batch_workers),
            config,
        })
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Read `content` to the end and persist it as a new blob.
    ///
    /// # Returns
    /// * `Ok(BlobId)` - The id issued for the new blob
    /// * `Err(BlobStoreError::Storage)` - The content could not be read or
    ///   the provider failed the write. Nothing is persisted.
    pub async fn add_one<R>(
        &self,
        name: impl Into<String>,
        content: R,
    ) -> Result<BlobId, BlobStoreError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let name = name.into();
        match ingest(&self.provider, name.clone(), content, self.config.save_timeout).await {
            Ok(blob) => {
                info!(blob_id = %blob.id, name = %blob.name, size = blob.size(), "saved blob");
                Ok(blob.id)
            }
            Err(e) => {
                warn!(name = %name, "failed to save blob: {e}");
                Err(BlobStoreError::storage(name, e))
            }
        }
    }

    /// Persist every item concurrently as one fail-together batch.
    ///
    /// Each item runs as its own task holding a permit from the shared
    /// worker pool. The call returns once every task has finished. On full
    /// success the ids come back in submission order. If any item fails the
    /// whole call fails with [`BatchError`]; items that did succeed are not
    /// rolled back and are listed in `BatchError::persisted`.
    ///
    /// Dropping the returned future aborts items that have not finished.
    pub async fn add_many<I, R>(&self, items: I) -> Result<Vec<BlobId>, BlobStoreError>
    where
        I: IntoIterator<Item = (String, R)>,
        R: AsyncRead + Send + Unpin + 'static,
    {
        let items: Vec<(String, R)> = items.into_iter().collect();
        let total = items.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let names: Vec<String> = items.iter().map(|(name, _)| name.clone()).collect();
        let mut outcomes: Vec<Option<Result<BlobId, StorageError>>> =
            (0..total).map(|_| None).collect();
        let mut workers = JoinSet::new();

        for (index, (name, content)) in items.into_iter().enumerate() {
            // Taken before spawning so at most `capacity` items are in flight
            let permit = match self.pool.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(index, name = %name, "batch worker pool unavailable: {e}");
                    outcomes[index] = Some(Err(StorageError::PoolClosed));
                    continue;
                }
            };

            let provider = self.provider.clone();
            let timeout = self.config.save_timeout;
            workers.spawn(
                async move {
                    let _permit = permit;
                    let result = ingest(&provider, name, content, timeout)
                        .await
                        .map(|blob| blob.id);
                    (index, result)
                }
                .instrument(Span::current()),
            );
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, result)) => outcomes[index] = Some(result),
                Err(e) if e.is_cancelled() => trace!("batch worker cancelled: {e}"),
                Err(e) => error!("batch worker failed: {e}"),
            }
        }

        let mut persisted = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (index, (name, outcome)) in names.into_iter().zip(outcomes).enumerate() {
            match outcome.unwrap_or(Err(StorageError::WorkerLost)) {
                Ok(id) => {
                    info!(blob_id = %id, name = %name, index, "saved batch item");
                    persisted.push(id);
                }
                Err(error) => {
                    warn!(name = %name, index, "failed to save batch item: {error}");
                    failures.push(BatchItemFailure { index, name, error });
                }
            }
        }

        if failures.is_empty() {
            info!(count = total, "saved batch");
            return Ok(persisted);
        }

        let err = BatchError {
            total,
            persisted,
            failures,
        };
        error!(total, failed = err.failures.len(), "batch save failed: {err}");
        Err(err.into())
    }

    pub async fn get(&self, id: BlobId) -> Result<Blob, BlobStoreError> {
        match self.provider.get(id).await {
            Ok(Some(blob)) => Ok(blob),
            Ok(None) => {
                warn!(blob_id = %id, "blob not found");
                Err(BlobStoreError::NotFound(id))
            }
            Err(e) => {
                error!(blob_id = %id, "failed to load blob: {e}");
                Err(e.into())
            }
        }
    }

    /// Names of every blob whose name starts with `prefix`, exact and
    /// case-sensitive, in provider order
    pub async fn names_by_prefix(&self, prefix: &str) -> Result<Vec<String>, BlobStoreError> {
        let blobs = self
            .provider
            .find_by_name_prefix(prefix)
            .await
            .inspect_err(|e| error!(prefix, "failed to look up blobs by prefix: {e}"))?;

        Ok(blobs.into_iter().map(|blob| blob.name).collect())
    }

    pub async fn names(&self) -> Result<Vec<String>, BlobStoreError> {
        let blobs = self
            .provider
            .list()
            .await
            .inspect_err(|e| error!("failed to list blobs: {e}"))?;

        Ok(blobs.into_iter().map(|blob| blob.name).collect())
    }

    /// Change the name of an existing blob, leaving its content untouched.
    ///
    /// Fails with [`BlobStoreError::NotFound`] without writing anything if
    /// the id has no live blob.
    pub async fn rename(
        &self,
        id: BlobId,
        new_name: impl Into<String>,
    ) -> Result<(), BlobStoreError> {
        let new_name = new_name.into();
        let mut blob = self.get(id).await?;
        let old_name = std::mem::replace(&mut blob.name, new_name.clone());

        self.write_existing(blob).await?;

        info!(blob_id = %id, from = %old_name, to = %new_name, "renamed blob");
        Ok(())
    }

    /// Overwrite the name and content of an existing blob, keeping its id.
    ///
    /// A missing id fails with [`BlobStoreError::NotFound`]; nothing is
    /// created in its place.
    pub async fn replace<R>(
        &self,
        id: BlobId,
        new_name: impl Into<String>,
        mut content: R,
    ) -> Result<(), BlobStoreError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let new_name = new_name.into();
        let mut buf = Vec::new();
        if let Err(e) = content.read_to_end(&mut buf).await {
            warn!(blob_id = %id, name = %new_name, "failed to read replacement content: {e}");
            return Err(BlobStoreError::storage(new_name, e.into()));
        }

        let blob = Blob::new(id, new_name, buf);
        let size = blob.size();
        let blob = self.write_existing(blob).await?;

        info!(blob_id = %id, name = %blob.name, size, "replaced blob");
        Ok(())
    }

    /// Remove a blob. Removing an absent id succeeds.
    pub async fn delete(&self, id: BlobId) -> Result<(), BlobStoreError> {
        let removed = self
            .provider
            .delete(id)
            .await
            .inspect_err(|e| error!(blob_id = %id, "failed to delete blob: {e}"))?;

        info!(blob_id = %id, removed, "deleted blob");
        Ok(())
    }

    /// Remove every listed blob, skipping ids with no live blob.
    ///
    /// Not atomic: a provider failure part-way may leave some ids removed.
    pub async fn delete_many(&self, ids: &[BlobId]) -> Result<(), BlobStoreError> {
        let removed = self
            .provider
            .delete_many(ids)
            .await
            .inspect_err(|e| error!(?ids, "failed to delete blobs: {e}"))?;

        info!(?ids, removed, "deleted blobs");
        Ok(())
    }

    /// Overwrite an existing record, keeping "no such id" apart from write failures
    async fn write_existing(&self, blob: Blob) -> Result<Blob, BlobStoreError> {
        let id = blob.id;
        let name = blob.name.clone();

        let failure = match bounded(self.config.save_timeout, self.provider.update(blob)).await {
            Ok(Ok(blob)) => return Ok(blob),
            Ok(Err(BlobProviderError::NotFound(_))) => {
                warn!(blob_id = %id, "blob not found");
                return Err(BlobStoreError::NotFound(id));
            }
            Ok(Err(e)) => StorageError::provider(e),
            Err(timeout) => timeout,
        };

        warn!(blob_id = %id, name = %name, "failed to update blob: {failure}");
        Err(BlobStoreError::storage(name, failure))
    }
}

/// Read the whole source and insert it as a fresh blob
async fn ingest<P, R>(
    provider: &P,
    name: String,
    mut content: R,
    timeout: Option<Duration>,
) -> Result<Blob, StorageError>
where
    P: BlobProvider,
    R: AsyncRead + Send + Unpin,
{
    let mut buf = Vec::new();
    content.read_to_end(&mut buf).await?;

    bounded(timeout, provider.insert(NewBlob::new(name, buf)))
        .await?
        .map_err(StorageError::provider)
}

/// Apply the optional save timeout to a provider write
async fn bounded<F>(timeout: Option<Duration>, write: F) -> Result<F::Output, StorageError>
where
    F: Future,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, write)
            .await
            .map_err(|_| StorageError::Timeout(limit)),
        None => Ok(write.await),
    }
}
