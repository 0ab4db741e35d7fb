mod utils;

use std::time::Duration;

use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use utils::{graceful_shutdown_blocker, register_panic_logger, report_build_info};

use crate::http;
use crate::{Config, ServiceState};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Install the global tracing subscriber. The returned guard flushes
///  buffered log lines on drop and must be held for the life of the process.
pub fn init_tracing(log_level: tracing::Level) -> tracing_appender::non_blocking::WorkerGuard {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    guard
}

/// Run the service until a shutdown signal arrives
pub async fn spawn_service(service_config: &Config) {
    let _guard = init_tracing(service_config.log_level);

    register_panic_logger();
    report_build_info();

    let (graceful_waiter, _shutdown_tx, shutdown_rx) = match graceful_shutdown_blocker() {
        Ok(blocker) => blocker,
        Err(e) => {
            tracing::error!("failed to install signal handlers: {}", e);
            std::process::exit(2);
        }
    };

    let state = match ServiceState::from_config(service_config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            std::process::exit(3);
        }
    };

    // Start API server
    let api_config = http::Config::from(service_config);
    let api_listen_addr = api_config.listen_addr;
    let api_rx = shutdown_rx.clone();
    let mut api_handle = tokio::spawn(async move {
        tracing::info!("Starting API server on {}", api_listen_addr);
        if let Err(e) = http::run_api(api_config, state, api_rx).await {
            tracing::error!("API server error: {}", e);
        }
    });

    tokio::select! {
        _ = graceful_waiter => {}
        _ = &mut api_handle => {
            tracing::error!("API server stopped before shutdown was requested");
            std::process::exit(1);
        }
    }

    if timeout(FINAL_SHUTDOWN_TIMEOUT, api_handle).await.is_err() {
        tracing::error!(
            "Failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        );
        std::process::exit(4);
    }

    tracing::info!("shutdown complete");
}
