//! Stratforge API Server
//!
//! HTTP API server exposing the indicator catalog, strategy CRUD, code
//! generation, and export endpoints. The service is stateless apart from the
//! in-memory strategy store and can be horizontally scaled behind a shared
//! backend.

use dotenvy::dotenv;
use stratforge::core::http::start_server;
use stratforge::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = stratforge::config::get_port();
    let env = stratforge::config::get_environment();
    info!("Starting Stratforge API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
