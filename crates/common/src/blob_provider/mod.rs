mod memory;
mod provider;

pub use memory::{MemoryBlobProvider, MemoryBlobProviderError};
pub use provider::{BlobProvider, BlobProviderError};
