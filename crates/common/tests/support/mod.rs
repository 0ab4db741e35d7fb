//! Shared test utilities for blob store integration tests
#![allow(dead_code)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};

use common::blob::{Blob, BlobId, NewBlob};
use common::blob_provider::{
    BlobProvider, BlobProviderError, MemoryBlobProvider, MemoryBlobProviderError,
};
use common::blob_store::{BlobStore, BlobStoreConfig};

/// A content source the batch API accepts for any mix of readers
pub type Source = Box<dyn AsyncRead + Send + Unpin>;

pub fn source(bytes: &[u8]) -> Source {
    Box::new(Cursor::new(bytes.to_vec()))
}

pub fn broken_source() -> Source {
    Box::new(FailingReader)
}

pub fn memory_store() -> (BlobStore<MemoryBlobProvider>, MemoryBlobProvider) {
    let provider = MemoryBlobProvider::new();
    (BlobStore::new(provider.clone()), provider)
}

/// Reader whose first read fails, like an upload cut off mid-stream
pub struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "upload interrupted",
        )))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlakyError {
    #[error("refused to store {0:?}")]
    Rejected(String),
    #[error("backend offline")]
    Offline,
    #[error(transparent)]
    Memory(#[from] MemoryBlobProviderError),
}

fn lift(err: BlobProviderError<MemoryBlobProviderError>) -> BlobProviderError<FlakyError> {
    match err {
        BlobProviderError::Provider(e) => BlobProviderError::Provider(e.into()),
        BlobProviderError::NotFound(id) => BlobProviderError::NotFound(id),
    }
}

/// Memory provider that fails on demand.
///
/// Writes of a blob whose name contains `"reject"` fail, writes of a name
/// containing `"panic"` panic, and every call fails while `offline` is set.
#[derive(Debug, Clone, Default)]
pub struct FlakyProvider {
    pub inner: MemoryBlobProvider,
    offline: Arc<AtomicBool>,
}

impl FlakyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), BlobProviderError<FlakyError>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BlobProviderError::Provider(FlakyError::Offline));
        }
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<(), BlobProviderError<FlakyError>> {
        self.check_online()?;
        if name.contains("panic") {
            panic!("provider blew up on {name:?}");
        }
        if name.contains("reject") {
            return Err(BlobProviderError::Provider(FlakyError::Rejected(
                name.to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobProvider for FlakyProvider {
    type Error = FlakyError;

    async fn insert(&self, blob: NewBlob) -> Result<Blob, BlobProviderError<FlakyError>> {
        self.check_name(&blob.name)?;
        self.inner.insert(blob).await.map_err(lift)
    }

    async fn update(&self, blob: Blob) -> Result<Blob, BlobProviderError<FlakyError>> {
        self.check_name(&blob.name)?;
        self.inner.update(blob).await.map_err(lift)
    }

    async fn get(&self, id: BlobId) -> Result<Option<Blob>, BlobProviderError<FlakyError>> {
        self.check_online()?;
        self.inner.get(id).await.map_err(lift)
    }

    async fn find_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Blob>, BlobProviderError<FlakyError>> {
        self.check_online()?;
        self.inner.find_by_name_prefix(prefix).await.map_err(lift)
    }

    async fn list(&self) -> Result<Vec<Blob>, BlobProviderError<FlakyError>> {
        self.check_online()?;
        self.inner.list().await.map_err(lift)
    }

    async fn delete(&self, id: BlobId) -> Result<bool, BlobProviderError<FlakyError>> {
        self.check_online()?;
        self.inner.delete(id).await.map_err(lift)
    }

    async fn delete_many(&self, ids: &[BlobId]) -> Result<u64, BlobProviderError<FlakyError>> {
        self.check_online()?;
        self.inner.delete_many(ids).await.map_err(lift)
    }
}

pub fn flaky_store() -> (BlobStore<FlakyProvider>, FlakyProvider) {
    let provider = FlakyProvider::new();
    (BlobStore::new(provider.clone()), provider)
}

/// Memory provider whose inserts take `delay` and record how many were
/// running at the same time
#[derive(Debug, Clone)]
pub struct SlowProvider {
    pub inner: MemoryBlobProvider,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryBlobProvider::new(),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Highest number of inserts observed running at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobProvider for SlowProvider {
    type Error = MemoryBlobProviderError;

    async fn insert(&self, blob: NewBlob) -> Result<Blob, BlobProviderError<Self::Error>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        let result = self.inner.insert(blob).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn update(&self, blob: Blob) -> Result<Blob, BlobProviderError<Self::Error>> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(blob).await
    }

    async fn get(&self, id: BlobId) -> Result<Option<Blob>, BlobProviderError<Self::Error>> {
        self.inner.get(id).await
    }

    async fn find_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Blob>, BlobProviderError<Self::Error>> {
        self.inner.find_by_name_prefix(prefix).await
    }

    async fn list(&self) -> Result<Vec<Blob>, BlobProviderError<Self::Error>> {
        self.inner.list().await
    }

    async fn delete(&self, id: BlobId) -> Result<bool, BlobProviderError<Self::Error>> {
        self.inner.delete(id).await
    }

    async fn delete_many(&self, ids: &[BlobId]) -> Result<u64, BlobProviderError<Self::Error>> {
        self.inner.delete_many(ids).await
    }
}

pub fn slow_store(
    delay: Duration,
    config: BlobStoreConfig,
) -> (BlobStore<SlowProvider>, SlowProvider) {
    let provider = SlowProvider::new(delay);
    let store = BlobStore::with_config(provider.clone(), config).unwrap();
    (store, provider)
}
