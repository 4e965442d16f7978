//! InfluxDB accessor against a mock HTTP API.

use std::time::Duration;

use hpx_telemetry::{TelemetryAccessor, TelemetryError};
use hpx_testing::ids::{ru, rus, ue, ues};
use hpx_xapp::telemetry::{InfluxConfig, InfluxTelemetry};
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> InfluxConfig {
    InfluxConfig {
        url: server.uri(),
        database: "RIC-Test".to_string(),
        username: None,
        password: None,
        ru_measurement: "sim_RUs".to_string(),
        ue_measurement: "sim_UEs".to_string(),
        request_timeout: Duration::from_millis(500),
    }
}

fn series(columns: &[&str], values: Vec<Value>) -> Value {
    json!({
        "results": [{
            "statement_id": 0,
            "series": [{
                "name": "ignored",
                "columns": columns,
                "values": [values],
            }]
        }]
    })
}

async fn mount_query(server: &MockServer, query: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("db", "RIC-Test"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reads_latest_ru_row() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "SELECT * FROM \"sim_RUs\" WHERE \"uid\" = 'RU_1' ORDER BY time DESC LIMIT 1",
        series(
            &["time", "connections", "free_PRB", "uid"],
            vec![
                json!("2024-01-01T00:00:00Z"),
                json!("UE_1,UE_2,"),
                json!(42.0),
                json!("RU_1"),
            ],
        ),
    )
    .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let record = influx.latest_ru(&ru("RU_1")).await.unwrap();

    assert_eq!(record.free_prb, 42);
    assert_eq!(record.connections, ues(&["UE_1", "UE_2"]));
}

#[tokio::test]
async fn test_reads_ue_with_ranked_close_columns() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "SELECT * FROM \"sim_UEs\" WHERE \"uid\" = 'UE_1' ORDER BY time DESC LIMIT 1",
        series(
            &["time", "demand", "ru_close_1", "ru_close_0", "ru_close_dist_0", "uid"],
            vec![
                json!(1),
                json!(7),
                json!("RU_3"),
                json!("RU_2"),
                json!(12.5),
                json!("UE_1"),
            ],
        ),
    )
    .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let record = influx.latest_ue(&ue("UE_1")).await.unwrap();

    assert_eq!(record.demand, 7);
    assert_eq!(record.near_rus, rus(&["RU_2", "RU_3"]));
}

#[tokio::test]
async fn test_missing_series_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"statement_id": 0}]})),
        )
        .mount(&server)
        .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let err = influx.latest_ru(&ru("RU_9")).await.unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_statement_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"results": [{"statement_id": 0, "error": "database not found: RIC-Test"}]}),
        ))
        .mount(&server)
        .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let err = influx.latest_ru(&ru("RU_1")).await.unwrap_err();

    assert!(matches!(
        err,
        TelemetryError::Unavailable { ref reason, .. } if reason.contains("database not found")
    ));
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "authorization failed"})),
        )
        .mount(&server)
        .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let err = influx.latest_ue(&ue("UE_1")).await.unwrap_err();

    assert_eq!(err.category(), "unavailable");
}

#[tokio::test]
async fn test_malformed_row_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series(
            &["time", "free_PRB", "uid"],
            vec![json!(1), json!("many"), json!("RU_1")],
        )))
        .mount(&server)
        .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    let err = influx.latest_ru(&ru("RU_1")).await.unwrap_err();

    assert_eq!(err.category(), "malformed");
}

#[tokio::test]
async fn test_sends_basic_auth_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(basic_auth("ric", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series(
            &["free_PRB", "connections", "uid"],
            vec![json!(5), json!(""), json!("RU_1")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.username = Some("ric".to_string());
    config.password = Some("secret".to_string());

    let influx = InfluxTelemetry::new(config).unwrap();
    let record = influx.latest_ru(&ru("RU_1")).await.unwrap();
    assert!(record.connections.is_empty());
}

#[tokio::test]
async fn test_health_check_pings_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let influx = InfluxTelemetry::new(config(&server)).unwrap();
    assert!(influx.health_check().await.is_ok());
}

#[tokio::test]
async fn test_health_check_fails_when_unreachable() {
    let server = MockServer::start().await;
    let config = config(&server);
    drop(server);

    let influx = InfluxTelemetry::new(config).unwrap();
    assert!(influx.health_check().await.is_err());
}
