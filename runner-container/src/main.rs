mod routes;

use anyhow::{Context, Result};
use greeter_core::config::{GreeterConfig, load_config};
use greeter_core::errors::GreeterError;
use greeter_core::telemetry::init_tracing;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use warp::Filter;

const MAX_BIND_ATTEMPTS: u32 = 5;

/// Entry point for serving the greeter as a long-running HTTP process on
/// container hosts (ECS, EKS, plain docker) or locally during development.
///
/// What it does at a high-level:
///     Load config (first argument as a file path, else `GREETER_CONFIG`, else defaults).
///     Bind the listener, retrying while the address is still held.
///     Serve until Ctrl-C, then drain in-flight requests for the grace period.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.logging);
    info!(
        "Starting greeter server (config: {})",
        config_path.as_deref().unwrap_or("<env/defaults>")
    );

    serve(&config).await
}

async fn serve(config: &GreeterConfig) -> Result<()> {
    let addr = config.server.socket_addr()?;
    let shutdown = Arc::new(Notify::new());

    let mut attempt = 0;
    let server = loop {
        attempt += 1;
        match bind(addr, shutdown.clone()) {
            Ok(server) => break server,
            Err(e) if e.is_retryable() && attempt < MAX_BIND_ATTEMPTS => {
                let delay = Duration::from_millis(500 * attempt as u64);
                warn!(
                    "Failed to bind {}: {}. Retrying in {:?} (attempt {}/{})",
                    addr, e, delay, attempt, MAX_BIND_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!("Failed to bind {}: {}", addr, e);
                return Err(e.into());
            }
        }
    };

    let server = tokio::spawn(server);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received, draining in-flight requests");
    shutdown.notify_one();

    let grace = Duration::from_millis(config.server.shutdown_grace_ms);
    match tokio::time::timeout(grace, server).await {
        Ok(Ok(())) => info!("Server stopped"),
        Ok(Err(e)) => error!("Server task failed: {}", e),
        Err(_) => warn!("Requests still in flight after {:?}, exiting anyway", grace),
    }
    Ok(())
}

fn bind(
    addr: SocketAddr,
    shutdown: Arc<Notify>,
) -> Result<impl std::future::Future<Output = ()> + Send + 'static, GreeterError> {
    let routes = routes::greeter().with(warp::log("greeter_server"));

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async move { shutdown.notified().await })
        .map_err(bind_error)?;

    info!("Listening on http://{}", bound);
    Ok(server)
}

/// Keeps the kind of the underlying socket error so only `AddrInUse` is retried.
fn bind_error(e: warp::Error) -> GreeterError {
    let kind = io_error_kind(&e).unwrap_or(io::ErrorKind::Other);
    GreeterError::Io(io::Error::new(kind, e))
}

fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = e.source();
    }
    None
}
