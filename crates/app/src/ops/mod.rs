pub mod init_config;
pub mod serve;
pub mod version;

pub use init_config::InitConfig;
pub use serve::Serve;
pub use version::Version;
