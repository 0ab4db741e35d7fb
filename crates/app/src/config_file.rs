use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use common::prelude::BlobStoreConfig;
use service::config::{DEFAULT_API_PORT, DEFAULT_MAX_UPLOAD_SIZE_BYTES};

/// Settings read from a TOML file. Missing keys fall back to the defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub listen_addr: SocketAddr,
    /// tracing level name, e.g. "info" or "debug"
    pub log_level: String,
    pub max_upload_size: usize,
    /// sqlite file to store blobs in, in-memory when absent
    pub database: Option<PathBuf>,
    pub blob_store: BlobStoreConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_API_PORT),
            log_level: "info".to_string(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            database: None,
            blob_store: BlobStoreConfig::default(),
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigFileError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}
