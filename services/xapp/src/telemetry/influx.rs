//! InfluxDB 1.x telemetry accessor.
//!
//! Reads the latest row for an entity through the `/query` HTTP endpoint
//! and hands the row to the shared decoders in `hpx_telemetry::row`.

use std::time::Duration;

use async_trait::async_trait;
use hpx_id::{RuId, UeId};
use hpx_telemetry::{row, RuRecord, TelemetryAccessor, TelemetryError, TelemetryResult, UeRecord};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    /// Base URL of the InfluxDB HTTP API (example: http://localhost:8086).
    pub url: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Measurement holding RU rows.
    pub ru_measurement: String,

    /// Measurement holding UE rows.
    pub ue_measurement: String,

    pub request_timeout: Duration,
}

/// Telemetry accessor backed by an InfluxDB 1.x server.
#[derive(Debug, Clone)]
pub struct InfluxTelemetry {
    client: reqwest::Client,
    config: InfluxConfig,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl InfluxTelemetry {
    pub fn new(config: InfluxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// Fetch the newest row of `measurement` whose `uid` tag equals `id`.
    async fn latest_row(
        &self,
        kind: &'static str,
        measurement: &str,
        id: &str,
    ) -> TelemetryResult<Map<String, Value>> {
        let query = latest_query(measurement, id);
        debug!(%kind, %id, %query, "Querying InfluxDB");

        let mut request = self
            .client
            .get(format!("{}/query", self.config.url))
            .query(&[("db", self.config.database.as_str()), ("q", query.as_str())]);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TelemetryError::unavailable(id, e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TelemetryError::unavailable(id, e.to_string()))?;

        // Error responses still carry a JSON `error` field when the server
        // produced them; proxies may not.
        let parsed: QueryResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(TelemetryError::unavailable(
                    id,
                    format!("invalid query response: {e}"),
                ))
            }
            Err(_) => {
                return Err(TelemetryError::unavailable(id, format!("HTTP {status}")));
            }
        };

        if let Some(error) = parsed.error {
            return Err(TelemetryError::unavailable(id, error));
        }
        if !status.is_success() {
            return Err(TelemetryError::unavailable(id, format!("HTTP {status}")));
        }

        let statement = parsed.results.into_iter().next();
        if let Some(error) = statement.as_ref().and_then(|s| s.error.clone()) {
            return Err(TelemetryError::unavailable(id, error));
        }

        statement
            .and_then(|s| s.series.into_iter().next())
            .and_then(first_row)
            .ok_or_else(|| TelemetryError::not_found(kind, id))
    }
}

#[async_trait]
impl TelemetryAccessor for InfluxTelemetry {
    async fn latest_ru(&self, id: &RuId) -> TelemetryResult<RuRecord> {
        let fields = self
            .latest_row("RU", &self.config.ru_measurement, id.as_str())
            .await?;
        row::decode_ru(id, &fields)
    }

    async fn latest_ue(&self, id: &UeId) -> TelemetryResult<UeRecord> {
        let fields = self
            .latest_row("UE", &self.config.ue_measurement, id.as_str())
            .await?;
        row::decode_ue(id, &fields)
    }

    async fn health_check(&self) -> TelemetryResult<()> {
        let response = self
            .client
            .get(format!("{}/ping", self.config.url))
            .send()
            .await
            .map_err(|e| TelemetryError::unavailable("ping", e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TelemetryError::unavailable(
                "ping",
                format!("HTTP {}", response.status()),
            ))
        }
    }
}

fn first_row(series: Series) -> Option<Map<String, Value>> {
    let values = series.values.into_iter().next()?;
    Some(series.columns.into_iter().zip(values).collect())
}

pub(crate) fn latest_query(measurement: &str, id: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE \"{}\" = {} ORDER BY time DESC LIMIT 1",
        quote_identifier(measurement),
        row::UID,
        quote_literal(id),
    )
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
