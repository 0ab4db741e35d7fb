/**
 * Stored blob entity and its identifier.
 */
pub mod blob;
/**
 * Persistence port the blob store depends on,
 *  plus an in-memory implementation for tests
 *  and embedders.
 */
pub mod blob_provider;
/**
 * The blob store service layer.
 *  Single-item and batch operations over a
 *  provider, with a shared bounded worker pool
 *  for batch ingestion.
 */
pub mod blob_store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::blob::{Blob, BlobId, NewBlob};
    pub use crate::blob_provider::{
        BlobProvider, BlobProviderError, MemoryBlobProvider, MemoryBlobProviderError,
    };
    pub use crate::blob_store::{
        BatchError, BatchItemFailure, BlobStore, BlobStoreConfig, BlobStoreConfigError,
        BlobStoreError, StorageError, WorkerPool,
    };
    pub use crate::version::build_info;
}
