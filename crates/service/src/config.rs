use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use common::prelude::BlobStoreConfig;

/// Maximum upload size in bytes (500 MB)
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 500 * 1024 * 1024;

pub const DEFAULT_API_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the API server to listen on
    pub listen_addr: SocketAddr,
    /// largest request body accepted, uploads included
    pub max_upload_size: usize,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // blob store configuration
    /// how many batch items may be saved at once,
    ///  shared across all in-flight batches
    pub max_batch_workers: usize,
    /// bound on each individual write, if not set
    ///  writes may take as long as the database needs
    pub save_timeout: Option<Duration>,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        let store = BlobStoreConfig::default();
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_API_PORT),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            sqlite_path: None,
            max_batch_workers: store.max_batch_workers,
            save_timeout: store.save_timeout,
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    pub fn blob_store_config(&self) -> BlobStoreConfig {
        BlobStoreConfig {
            max_batch_workers: self.max_batch_workers,
            save_timeout: self.save_timeout,
        }
    }
}
