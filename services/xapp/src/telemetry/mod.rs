//! Telemetry backends and startup wait.

mod influx;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use hpx_telemetry::{InMemoryTelemetry, TelemetryAccessor, TelemetryDump};
use tokio::sync::watch;
use tracing::{info, warn};

pub use influx::{InfluxConfig, InfluxTelemetry};

use crate::config::TelemetryBackend;

/// Build the accessor selected by configuration.
pub fn build_accessor(backend: &TelemetryBackend) -> Result<Arc<dyn TelemetryAccessor>> {
    match backend {
        TelemetryBackend::Influx(config) => {
            let accessor =
                InfluxTelemetry::new(config.clone()).context("Failed to build InfluxDB client")?;
            info!(url = %config.url, database = %config.database, "Using InfluxDB telemetry");
            Ok(Arc::new(accessor))
        }
        TelemetryBackend::Memory { snapshot: None } => {
            warn!("Using empty in-memory telemetry; every run will find no telemetry");
            Ok(Arc::new(InMemoryTelemetry::new()))
        }
        TelemetryBackend::Memory {
            snapshot: Some(path),
        } => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read telemetry snapshot {}", path.display()))?;
            let dump = TelemetryDump::from_json(&raw)
                .with_context(|| format!("Invalid telemetry snapshot {}", path.display()))?;
            let store = dump
                .to_store()
                .with_context(|| format!("Invalid telemetry snapshot {}", path.display()))?;
            info!(
                path = %path.display(),
                rus = store.ru_count(),
                ues = store.ue_count(),
                "Using in-memory telemetry"
            );
            Ok(Arc::new(store))
        }
    }
}

/// Retry the accessor's health check until it succeeds.
///
/// Returns false if shutdown was requested first.
pub async fn wait_until_ready(
    accessor: &dyn TelemetryAccessor,
    retry: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    let mut attempt: u32 = 0;
    loop {
        if *shutdown.borrow() {
            return false;
        }

        attempt += 1;
        match accessor.health_check().await {
            Ok(()) => {
                info!(attempt, "Telemetry store reachable");
                return true;
            }
            Err(e) => {
                warn!(
                    attempt,
                    error = %e,
                    retry_ms = retry.as_millis() as u64,
                    "Telemetry store not reachable, retrying"
                );
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(retry) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return false;
                }
            }
        }
    }
}
