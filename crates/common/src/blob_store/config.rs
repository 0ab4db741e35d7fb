use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::BlobStoreConfigError;

/// Default number of batch items saved in parallel across the whole store
pub const DEFAULT_MAX_BATCH_WORKERS: usize = 16;

/// Hard ceiling for `max_batch_workers`, catches misconfiguration
pub const MAX_BATCH_WORKERS_LIMIT: usize = 1024;

/// Configuration for the [`BlobStore`](super::BlobStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobStoreConfig {
    /// Upper bound on concurrently running batch workers.
    ///  Shared by every batch submitted to the same store,
    ///  a single batch uses at most min(len, max_batch_workers)
    pub max_batch_workers: usize,
    /// Optional bound on each provider write. None waits forever.
    ///
    /// The timed-out write is dropped, not rolled back: if the provider had
    ///  already committed it, the blob is stored even though the call
    ///  reports `StorageError::Timeout`.
    #[serde(with = "opt_secs")]
    pub save_timeout: Option<Duration>,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            max_batch_workers: DEFAULT_MAX_BATCH_WORKERS,
            save_timeout: None,
        }
    }
}

impl BlobStoreConfig {
    pub fn validate(&self) -> Result<(), BlobStoreConfigError> {
        if self.max_batch_workers == 0 {
            return Err(BlobStoreConfigError::NoWorkers);
        }
        if self.max_batch_workers > MAX_BATCH_WORKERS_LIMIT {
            return Err(BlobStoreConfigError::TooManyWorkers(
                self.max_batch_workers,
                MAX_BATCH_WORKERS_LIMIT,
            ));
        }
        if self.save_timeout.is_some_and(|t| t.is_zero()) {
            return Err(BlobStoreConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// (De)serialize an optional timeout as a number of seconds
mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        match secs {
            Some(secs) if secs.is_finite() && secs >= 0.0 => {
                Ok(Some(Duration::from_secs_f64(secs)))
            }
            Some(secs) => Err(serde::de::Error::custom(format!("invalid timeout: {secs}"))),
            None => Ok(None),
        }
    }
}
