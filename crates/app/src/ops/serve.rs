use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use service::process::spawn_service;
use service::Config;

use crate::config_file::{ConfigFileError, FileConfig};
use crate::op::{Op, OpContext};

/// Run the HTTP service. Flags override values from the config file
#[derive(Args, Debug, Clone, Default)]
pub struct Serve {
    /// Port to listen on, keeps the configured host
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database file. Uses an in-memory database when neither
    ///  this nor the config file sets one
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<tracing::Level>,

    /// How many batch items may be written at once across all batches
    #[arg(long)]
    pub max_batch_workers: Option<usize>,

    /// Bound on each blob write, in seconds
    #[arg(long)]
    pub save_timeout_secs: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),
    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
    #[error("invalid save timeout {0}")]
    InvalidSaveTimeout(f64),
    #[error("invalid blob store config: {0}")]
    BlobStore(#[from] common::prelude::BlobStoreConfigError),
}

impl Serve {
    /// Merge the file config with the command line flags
    pub fn service_config(&self, file: FileConfig) -> Result<Config, ServeError> {
        let mut listen_addr = file.listen_addr;
        if let Some(port) = self.port {
            listen_addr.set_port(port);
        }

        let log_level = match self.log_level {
            Some(level) => level,
            None => file
                .log_level
                .parse()
                .map_err(|_| ServeError::InvalidLogLevel(file.log_level.clone()))?,
        };

        let mut blob_store = file.blob_store;
        if let Some(workers) = self.max_batch_workers {
            blob_store.max_batch_workers = workers;
        }
        if let Some(secs) = self.save_timeout_secs {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|_| ServeError::InvalidSaveTimeout(secs))?;
            blob_store.save_timeout = Some(timeout);
        }
        blob_store.validate()?;

        Ok(Config {
            listen_addr,
            max_upload_size: file.max_upload_size,
            sqlite_path: self.database.clone().or(file.database),
            max_batch_workers: blob_store.max_batch_workers,
            save_timeout: blob_store.save_timeout,
            log_level,
        })
    }
}

#[async_trait::async_trait]
impl Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let file = FileConfig::load_or_default(ctx.config_path.as_deref())?;
        let config = self.service_config(file)?;

        spawn_service(&config).await;
        Ok("service stopped".to_string())
    }
}
