//! Error types for the blob store.

use std::time::Duration;

use crate::blob::BlobId;
use crate::blob_provider::BlobProviderError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a single blob write did not complete.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading the source content failed
    #[error("failed to read content: {0}")]
    Read(#[from] std::io::Error),

    /// The provider rejected or failed the write
    #[error("provider failed to write blob: {0}")]
    Provider(#[source] BoxError),

    /// The provider did not answer within the configured save timeout
    #[error("write did not complete within {0:?}")]
    Timeout(Duration),

    /// The batch worker pool stopped handing out permits
    #[error("worker pool is closed")]
    PoolClosed,

    /// A batch worker ended without reporting a result (it panicked or was aborted)
    #[error("worker ended without reporting a result")]
    WorkerLost,
}

impl StorageError {
    pub(crate) fn provider<T>(err: BlobProviderError<T>) -> Self
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider(Box::new(err))
    }
}

/// One failed item of a batch.
#[derive(Debug, thiserror::Error)]
#[error("item {index} ({name:?}): {error}")]
pub struct BatchItemFailure {
    /// Position of the item in the submitted batch
    pub index: usize,
    pub name: String,
    #[source]
    pub error: StorageError,
}

/// A batch add in which at least one item failed.
///
/// Items that did succeed stay persisted; their ids are listed in
/// `persisted` so the caller can clean up or retry selectively.
#[derive(Debug, thiserror::Error)]
#[error("{} of {total} blobs could not be saved", .failures.len())]
pub struct BatchError {
    pub total: usize,
    /// Items known to be stored. An item that hit the save timeout is
    /// reported as a failure and left out, though its write may still
    /// have landed.
    pub persisted: Vec<BlobId>,
    pub failures: Vec<BatchItemFailure>,
}

/// Errors surfaced by [`BlobStore`](super::BlobStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    /// No live blob has the requested id
    #[error("blob not found: {0}")]
    NotFound(BlobId),

    /// A single blob could not be saved or replaced
    #[error("blob {name:?} could not be saved: {source}")]
    Storage {
        name: String,
        #[source]
        source: StorageError,
    },

    /// One or more items of a batch add failed
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// The provider failed on a read or delete
    #[error("blob provider error: {0}")]
    Provider(#[source] BoxError),
}

impl BlobStoreError {
    pub(crate) fn storage(name: impl Into<String>, source: StorageError) -> Self {
        Self::Storage {
            name: name.into(),
            source,
        }
    }

    /// Whether the error means "no such blob" rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl<T> From<BlobProviderError<T>> for BlobStoreError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: BlobProviderError<T>) -> Self {
        match err {
            BlobProviderError::NotFound(id) => Self::NotFound(id),
            other => Self::Provider(Box::new(other)),
        }
    }
}

/// Invalid [`BlobStoreConfig`](super::BlobStoreConfig).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlobStoreConfigError {
    #[error("max_batch_workers must be at least 1")]
    NoWorkers,

    #[error("max_batch_workers {0} exceeds the limit of {1}")]
    TooManyWorkers(usize, usize),

    #[error("save_timeout must be greater than zero")]
    ZeroTimeout,
}
