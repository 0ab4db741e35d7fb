use std::net::SocketAddr;

use crate::config::DEFAULT_MAX_UPLOAD_SIZE_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // Largest accepted request body
    pub max_upload_size: usize,
}

impl Config {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
        }
    }

    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }
}

impl From<&crate::Config> for Config {
    fn from(config: &crate::Config) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, max_upload_size={}",
            config.listen_addr,
            config.max_upload_size
        );
        Self::new(config.listen_addr).with_max_upload_size(config.max_upload_size)
    }
}
