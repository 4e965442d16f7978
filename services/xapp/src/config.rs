//! xApp configuration (env-driven).

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use hpx_planner::{PlannerConfig, ReservationPolicy};

use crate::telemetry::InfluxConfig;

/// Smallest accepted per-fetch timeout.
const MIN_FETCH_TIMEOUT_MS: u64 = 10;

/// Which telemetry store the xApp reads from.
#[derive(Debug, Clone)]
pub enum TelemetryBackend {
    Influx(InfluxConfig),

    /// In-memory store, optionally seeded from a JSON dump.
    Memory { snapshot: Option<PathBuf> },
}

impl TelemetryBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Influx(_) => "influx",
            Self::Memory { .. } => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Listener for message ingress, health and stats.
    pub listen_addr: SocketAddr,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Base URL of the peer that receives `HP_HANDOVERS`.
    pub peer_url: String,

    pub telemetry: TelemetryBackend,

    pub planner: PlannerConfig,

    /// Interval between telemetry connection attempts at startup.
    pub connect_retry: Duration,

    /// Upper bound for delivering one outbound message.
    pub send_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_addr = lookup("HPX_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("HPX_LISTEN_ADDR must be a socket address (host:port).")?;

        let log_level = lookup("HPX_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let peer_url = trim_url(
            lookup("HPX_PEER_URL").unwrap_or_else(|| "http://localhost:8090".to_string()),
        );

        let fetch_timeout_ms =
            millis(&lookup, "HPX_FETCH_TIMEOUT_MS", 500)?.max(MIN_FETCH_TIMEOUT_MS);
        let run_deadline_ms = millis(&lookup, "HPX_RUN_DEADLINE_MS", 5000)?.max(fetch_timeout_ms);

        let policy: ReservationPolicy = match lookup("HPX_RESERVATION_POLICY") {
            Some(value) => value
                .parse()
                .context("HPX_RESERVATION_POLICY is not a known policy.")?,
            None => ReservationPolicy::default(),
        };

        let planner = PlannerConfig {
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            run_deadline: Duration::from_millis(run_deadline_ms),
            policy,
        };

        let send_timeout =
            Duration::from_millis(millis(&lookup, "HPX_SEND_TIMEOUT_MS", 2000)?.max(1));
        let connect_retry =
            Duration::from_millis(millis(&lookup, "HPX_CONNECT_RETRY_MS", 1000)?.max(50));

        let backend = lookup("HPX_TELEMETRY_BACKEND").unwrap_or_else(|| "influx".to_string());
        let telemetry = match backend.trim().to_ascii_lowercase().as_str() {
            "influx" => TelemetryBackend::Influx(InfluxConfig {
                url: trim_url(
                    lookup("HPX_INFLUX_URL").unwrap_or_else(|| "http://localhost:8086".to_string()),
                ),
                database: lookup("HPX_INFLUX_DB").unwrap_or_else(|| "RIC-Test".to_string()),
                username: lookup("HPX_INFLUX_USER").filter(|v| !v.is_empty()),
                password: lookup("HPX_INFLUX_PASSWORD").filter(|v| !v.is_empty()),
                ru_measurement: lookup("HPX_RU_MEASUREMENT")
                    .unwrap_or_else(|| "sim_RUs".to_string()),
                ue_measurement: lookup("HPX_UE_MEASUREMENT")
                    .unwrap_or_else(|| "sim_UEs".to_string()),
                request_timeout: planner.fetch_timeout,
            }),
            "memory" => TelemetryBackend::Memory {
                snapshot: lookup("HPX_TELEMETRY_SNAPSHOT")
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from),
            },
            other => bail!("HPX_TELEMETRY_BACKEND must be 'influx' or 'memory', got '{other}'."),
        };

        Ok(Self {
            listen_addr,
            log_level,
            peer_url,
            telemetry,
            planner,
            connect_retry,
            send_timeout,
        })
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    Ok(lookup(key)
        .map(|v| v.trim().parse::<u64>())
        .transpose()
        .with_context(|| format!("{key} must be an integer (milliseconds)."))?
        .unwrap_or(default))
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.peer_url, "http://localhost:8090");
        assert_eq!(config.planner.fetch_timeout, Duration::from_millis(500));
        assert_eq!(config.planner.run_deadline, Duration::from_secs(5));
        assert_eq!(config.planner.policy, ReservationPolicy::Transactional);
        assert_eq!(config.send_timeout, Duration::from_secs(2));

        let TelemetryBackend::Influx(influx) = config.telemetry else {
            panic!("expected influx backend");
        };
        assert_eq!(influx.url, "http://localhost:8086");
        assert_eq!(influx.database, "RIC-Test");
        assert_eq!(influx.ru_measurement, "sim_RUs");
        assert_eq!(influx.ue_measurement, "sim_UEs");
        assert!(influx.username.is_none());
    }

    #[rstest]
    #[case::below_minimum("1", "5", 10, 10)]
    #[case::deadline_below_fetch("300", "100", 300, 300)]
    #[case::in_range("200", "800", 200, 800)]
    fn test_timeouts_are_clamped(
        #[case] fetch: &str,
        #[case] deadline: &str,
        #[case] expected_fetch_ms: u64,
        #[case] expected_deadline_ms: u64,
    ) {
        let config = load(&[
            ("HPX_FETCH_TIMEOUT_MS", fetch),
            ("HPX_RUN_DEADLINE_MS", deadline),
        ])
        .unwrap();
        assert_eq!(
            config.planner.fetch_timeout,
            Duration::from_millis(expected_fetch_ms)
        );
        assert_eq!(
            config.planner.run_deadline,
            Duration::from_millis(expected_deadline_ms)
        );
    }

    #[rstest]
    #[case::fetch_timeout("HPX_FETCH_TIMEOUT_MS", "soon")]
    #[case::backend("HPX_TELEMETRY_BACKEND", "redis")]
    #[case::policy("HPX_RESERVATION_POLICY", "greedy")]
    #[case::listen_addr("HPX_LISTEN_ADDR", "nowhere")]
    fn test_invalid_value_rejected(#[case] key: &str, #[case] value: &str) {
        assert!(load(&[(key, value)]).is_err());
    }

    #[test]
    fn test_memory_backend_with_snapshot() {
        let config = load(&[
            ("HPX_TELEMETRY_BACKEND", "memory"),
            ("HPX_TELEMETRY_SNAPSHOT", "/tmp/dump.json"),
            ("HPX_RESERVATION_POLICY", "eager"),
        ])
        .unwrap();
        assert_eq!(config.planner.policy, ReservationPolicy::Eager);
        match config.telemetry {
            TelemetryBackend::Memory { snapshot } => {
                assert_eq!(snapshot, Some(PathBuf::from("/tmp/dump.json")));
            }
            other => panic!("unexpected backend {}", other.name()),
        }
    }

    #[test]
    fn test_peer_url_trailing_slash_trimmed() {
        let config = load(&[("HPX_PEER_URL", "http://peer:9000/")]).unwrap();
        assert_eq!(config.peer_url, "http://peer:9000");
    }

}
