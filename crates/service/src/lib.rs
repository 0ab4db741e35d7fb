//! Blob repository service.
//!
//! This crate wires the blob store from `common` into a running server:
//! - Database (SQLite with a BlobProvider implementation)
//! - State management (database + blob store shared by handlers)
//! - HTTP handlers (health checks, the v1 blob API)
//! - Process bootstrap (tracing, graceful shutdown)

pub mod config;
pub mod database;
pub mod http;
pub mod process;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use database::{Database, DatabaseSetupError};
pub use state::{State as ServiceState, StateSetupError};
