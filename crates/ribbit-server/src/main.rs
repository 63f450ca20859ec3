//! ribbit-server - REST API server and digest daemon.

use std::net::SocketAddr;

use ribbit_core::config::RibbitConfig;
use ribbit_core::runtime::{DigestRuntime, RuntimeConfig};
use ribbit_server::{create_server, create_state};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Configuration from `RIBBIT_CONFIG` when set, otherwise from `RIBBIT_*` variables.
fn load_config() -> Result<RibbitConfig, Box<dyn std::error::Error>> {
    match std::env::var("RIBBIT_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration file");
            Ok(RibbitConfig::from_file(path)?)
        }
        Err(_) => Ok(RibbitConfig::from_env()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("ribbit_server=debug".parse()?),
        )
        .init();

    let host = std::env::var("RIBBIT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("RIBBIT_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| format!("RIBBIT_PORT must be a valid port number: {}", e))?;

    let config = load_config()?;
    let runtime_config = RuntimeConfig::from(&config.digest);
    let state = create_state(config)?;

    // Start the periodic digest check
    let runtime = DigestRuntime::new(state.scheduler().clone(), runtime_config).await?;
    runtime.start().await?;
    info!(
        interval_minutes = runtime.config().interval_minutes,
        "Digest check started"
    );
    state.attach_runtime(runtime).await;

    let app = create_server(state.clone());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting ribbit-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping digest check...");
        })
        .await?;

    if let Some(mut runtime) = state.take_runtime().await {
        runtime.shutdown().await?;
    }

    info!("Server stopped cleanly");
    Ok(())
}
