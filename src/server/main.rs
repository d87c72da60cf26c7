use anyhow::{Context, Result};
use clap::Parser;
use inpaint::common::init_logger;
use inpaint::inpaint::TeleaEngine;
use inpaint::server::{router, shutdown_signal, AppState, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger(env!("CARGO_CRATE_NAME"));
    let config = ServerConfig::parse();

    log::info!("Starting server...");

    let state = AppState::new(Arc::new(TeleaEngine::new()), config.batch_config());
    let app = router(state, &config);

    let addr = config.socket_addr();
    log::info!("Attempting to bind to {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    log::info!("Successfully bound to http://{}", addr);
    log::info!(
        "Inpainting with radius {}, uploads limited to {} MiB",
        config.radius,
        config.max_upload_mb
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}
