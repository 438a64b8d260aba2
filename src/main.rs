// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info};

use verdantia_server::{
    api::router,
    config::Config,
    db,
    error::StartupError,
    features::default_modules,
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env();
    logging::init(config.log_format, config.debug);
    config.log_warnings();
    config.ensure_directories()?;

    let handle = db::connect(&config.mongo_uri, config.mongo_db.as_deref()).await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| StartupError::BindAddress(format!("{}:{}", config.host, config.port)))?;

    let state = AppState::new(config, handle);
    let app = router(state, &default_modules())?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Verdantia server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
