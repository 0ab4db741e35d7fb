use common::prelude::{BlobStore, BlobStoreConfigError};

use super::config::Config;
use super::database::{Database, DatabaseSetupError};

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    blobs: BlobStore<Database>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let database = match config.sqlite_path {
            Some(ref path) => {
                // the file may be created, its directory may not
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if !parent.exists() {
                        return Err(StateSetupError::DatabasePathDoesNotExist);
                    }
                }
                tracing::info!("Database path: {}", path.display());
                Database::open(path).await?
            }
            // otherwise just set up an in-memory database
            None => {
                tracing::info!("Database path: in-memory");
                Database::in_memory().await?
            }
        };

        // 2. Setup blob store on top of it
        let blobs = BlobStore::with_config(database.clone(), config.blob_store_config())?;
        tracing::debug!(
            max_batch_workers = config.max_batch_workers,
            save_timeout = ?config.save_timeout,
            "blob store ready"
        );

        Ok(Self { database, blobs })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn blobs(&self) -> &BlobStore<Database> {
        &self.blobs
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid blob store configuration: {0}")]
    BlobStoreConfig(#[from] BlobStoreConfigError),
}
