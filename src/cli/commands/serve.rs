use anyhow::Result;
use scheduler::spawn_sweeper;
use tokio::{net::TcpListener, sync::watch};
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state_with_settings, Settings};
use crate::router::create_router;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

pub async fn serve(settings: Settings, run_sweeper: bool) -> Result<()> {
    trace!("Entering serve function");
    info!("SnapBook application starting up");
    debug!("Settings: {:?}", settings);

    let bind_address = settings.bind_address.clone();
    let interval = settings.sweep_interval();

    let state = match initialize_app_state_with_settings(settings).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = run_sweeper.then(|| spawn_sweeper(state.db.clone(), state.policy, interval, shutdown_rx));
    if sweeper.is_none() {
        info!("Booking sweeper disabled for this process");
    }

    let app = create_router(state);
    debug!("Router created successfully");

    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("SnapBook API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            error!("Sweeper task ended abnormally: {}", e);
        }
    }

    if let Err(e) = served {
        error!("Server error: {}", e);
        return Err(e.into());
    }
    info!("Server shutdown gracefully");
    Ok(())
}
