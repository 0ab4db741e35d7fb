use crate::config_file::{ConfigFileError, FileConfig};
use crate::op::{Op, OpContext};

/// Print a config file holding every default
#[derive(Debug, Clone, Copy)]
pub struct InitConfig;

#[derive(Debug, thiserror::Error)]
pub enum InitConfigError {
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),
}

#[async_trait::async_trait]
impl Op for InitConfig {
    type Error = InitConfigError;
    type Output = String;

    async fn execute(&self, _ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        Ok(FileConfig::default().to_toml()?)
    }
}
