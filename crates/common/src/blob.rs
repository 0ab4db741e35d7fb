use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identifier issued by a [`BlobProvider`](crate::blob_provider::BlobProvider)
/// the first time a blob is inserted.
///
/// Ids are opaque beyond equality and ordering; providers never reuse an id
/// once the record it named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(i64);

impl BlobId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A stored, named binary item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub id: BlobId,
    /// Display name. Not unique, may be empty.
    pub name: String,
    pub content: Bytes,
}

impl Blob {
    pub fn new(id: BlobId, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// A blob that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlob {
    pub name: String,
    pub content: Bytes,
}

impl NewBlob {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Attach the id issued by the provider.
    pub fn with_id(self, id: BlobId) -> Blob {
        Blob {
            id,
            name: self.name,
            content: self.content,
        }
    }
}
