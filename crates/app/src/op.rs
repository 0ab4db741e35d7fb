use std::path::PathBuf;

/// Shared inputs for every command
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    /// TOML config file passed with `--config`
    pub config_path: Option<PathBuf>,
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}
