use std::fmt::Debug;

use async_trait::async_trait;

use crate::blob::{Blob, BlobId, NewBlob};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobProviderError<T> {
    /// The backing store failed; the inner error is passed through as is
    #[error("unhandled blob provider error: {0}")]
    Provider(#[from] T),
    /// An update targeted an id with no live record
    #[error("blob not found: {0}")]
    NotFound(BlobId),
}

/// Persistence capability the blob store depends on.
///
/// Implementations must tolerate concurrent calls for distinct ids; the
/// store fans batch writes out across tasks and never serializes them.
#[async_trait]
pub trait BlobProvider: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new record and issue its id.
    ///
    /// # Returns
    /// * `Ok(Blob)` - The stored blob carrying its freshly issued id
    /// * `Err(BlobProviderError::Provider)` - Nothing was written
    async fn insert(&self, blob: NewBlob) -> Result<Blob, BlobProviderError<Self::Error>>;

    /// Overwrite the name and content of the record with `blob.id`.
    ///
    /// Should fail with the following errors to be considered correct:
    /// * `Err(BlobProviderError::NotFound)` - No live record has that id,
    ///   in which case nothing is written
    async fn update(&self, blob: Blob) -> Result<Blob, BlobProviderError<Self::Error>>;

    async fn get(&self, id: BlobId) -> Result<Option<Blob>, BlobProviderError<Self::Error>>;

    /// All live records whose name starts with `prefix`.
    ///
    /// Matching is exact and case-sensitive. Ordering is up to the
    /// implementation.
    async fn find_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Blob>, BlobProviderError<Self::Error>>;

    async fn list(&self) -> Result<Vec<Blob>, BlobProviderError<Self::Error>>;

    /// Remove a record. Removing an absent id is not an error.
    ///
    /// # Returns
    /// * `Ok(true)` if a record was removed, `Ok(false)` if none matched
    async fn delete(&self, id: BlobId) -> Result<bool, BlobProviderError<Self::Error>>;

    /// Remove every record in `ids`, skipping ids with no match.
    ///
    /// # Returns
    /// * `Ok(n)` - How many records were actually removed
    async fn delete_many(&self, ids: &[BlobId]) -> Result<u64, BlobProviderError<Self::Error>>;
}
