//! Handover prediction xApp.
//!
//! Listens for `HP_INVESTIGATE` messages, plans RU sleep against the
//! telemetry store, and forwards non-empty plans as `HP_HANDOVERS`.

use std::sync::Arc;

use anyhow::{Context, Result};
use hpx_planner::Planner;
use hpx_xapp::{
    api, config, messaging::Dispatcher, state::AppState, telemetry, transport::HttpMessageSender,
};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to HPX_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting hpx-xapp");
    info!(
        listen_addr = %config.listen_addr,
        peer_url = %config.peer_url,
        backend = config.telemetry.name(),
        policy = %config.planner.policy,
        fetch_timeout_ms = config.planner.fetch_timeout.as_millis() as u64,
        run_deadline_ms = config.planner.run_deadline.as_millis() as u64,
        "Configuration loaded"
    );

    // Ctrl+C flips the shutdown channel for every stage below
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
        }
        let _ = shutdown_tx.send(true);
    });

    let accessor = telemetry::build_accessor(&config.telemetry)?;
    if !telemetry::wait_until_ready(accessor.as_ref(), config.connect_retry, &mut shutdown_rx).await
    {
        info!("Shutdown requested before telemetry became reachable");
        return Ok(());
    }

    let sender = HttpMessageSender::new(config.peer_url.clone(), config.send_timeout)
        .context("Failed to build HTTP client for peer")?;
    let planner = Planner::new(config.planner.clone());
    let dispatcher = Dispatcher::new(planner, accessor, Arc::new(sender));
    let state = AppState::new(dispatcher);

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "Listening for messages");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                if shutdown_rx.changed().await.is_err() {
                    break;
                }
            }
            info!("HTTP server shutting down");
        })
        .await;

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("hpx-xapp shutdown complete");
    Ok(())
}
