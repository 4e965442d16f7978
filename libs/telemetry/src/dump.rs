//! JSON telemetry dumps.
//!
//! A dump is a list of raw rows per measurement, in write order:
//!
//! ```json
//! {
//!   "rus": [{ "uid": "RU_61", "free_PRB": 20, "connections": "UE_5,UE_43," }],
//!   "ues": [{ "uid": "UE_5", "demand": 2, "near_RU": "RU_61,RU_52," }]
//! }
//! ```
//!
//! Later rows for the same uid replace earlier ones, so only the latest
//! reading of each entity survives loading.

use hpx_id::{RuId, UeId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::row::{decode_ru, decode_ue, UID};
use crate::{InMemoryTelemetry, TelemetryError, TelemetryResult};

/// Raw rows for both measurements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryDump {
    #[serde(default)]
    pub rus: Vec<Map<String, Value>>,

    #[serde(default)]
    pub ues: Vec<Map<String, Value>>,
}

impl TelemetryDump {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Load the dump into an in-memory store.
    ///
    /// Rows without a valid `uid` fail the whole load. Rows with bad fields
    /// are kept as malformed readings.
    pub fn to_store(&self) -> TelemetryResult<InMemoryTelemetry> {
        let mut store = InMemoryTelemetry::new();

        for (index, row) in self.rus.iter().enumerate() {
            let id: RuId = row_uid(row, "rus", index)?;
            match decode_ru(&id, row) {
                Ok(record) => store.insert_ru(record),
                Err(e) => store.insert_malformed_ru(id, e.to_string()),
            };
        }

        for (index, row) in self.ues.iter().enumerate() {
            let id: UeId = row_uid(row, "ues", index)?;
            match decode_ue(&id, row) {
                Ok(record) => store.insert_ue(record),
                Err(e) => store.insert_malformed_ue(id, e.to_string()),
            };
        }

        Ok(store)
    }
}

fn row_uid<T>(row: &Map<String, Value>, table: &str, index: usize) -> TelemetryResult<T>
where
    T: std::str::FromStr<Err = hpx_id::IdError>,
{
    let location = format!("{table}[{index}]");
    let raw = row
        .get(UID)
        .and_then(Value::as_str)
        .ok_or_else(|| TelemetryError::malformed(&location, "missing uid"))?;
    raw.parse()
        .map_err(|e: hpx_id::IdError| TelemetryError::malformed(location, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryAccessor;

    const DUMP: &str = r#"{
        "rus": [
            { "uid": "RU_1", "free_PRB": 3, "connections": "UE_1," },
            { "uid": "RU_1", "free_PRB": 7, "connections": "UE_1,UE_2," },
            { "uid": "RU_2", "connections": "" }
        ],
        "ues": [
            { "uid": "UE_1", "demand": 2, "near_RU": "RU_1,RU_2," },
            { "uid": "UE_2", "demand": 1, "ru_close_0": "RU_1", "ru_close_1": "RU_3" }
        ]
    }"#;

    #[tokio::test]
    async fn test_latest_row_wins() {
        let store = TelemetryDump::from_json(DUMP).unwrap().to_store().unwrap();
        let ru = store.latest_ru(&"RU_1".parse().unwrap()).await.unwrap();
        assert_eq!(ru.free_prb, 7);
        assert_eq!(ru.connections.len(), 2);
    }

    #[tokio::test]
    async fn test_bad_rows_kept_as_malformed() {
        let store = TelemetryDump::from_json(DUMP).unwrap().to_store().unwrap();
        let err = store.latest_ru(&"RU_2".parse().unwrap()).await.unwrap_err();
        assert_eq!(err.category(), "malformed");
    }

    #[tokio::test]
    async fn test_ranked_columns_loaded() {
        let store = TelemetryDump::from_json(DUMP).unwrap().to_store().unwrap();
        let ue = store.latest_ue(&"UE_2".parse().unwrap()).await.unwrap();
        let near: Vec<&str> = ue.near_rus.iter().map(RuId::as_str).collect();
        assert_eq!(near, vec!["RU_1", "RU_3"]);
    }

    #[test]
    fn test_missing_uid_fails_load() {
        let dump = TelemetryDump::from_json(r#"{ "rus": [{ "free_PRB": 1 }] }"#).unwrap();
        let err = dump.to_store().unwrap_err();
        assert!(err.to_string().contains("rus[0]"));
    }

    #[test]
    fn test_empty_dump() {
        let store = TelemetryDump::from_json("{}").unwrap().to_store().unwrap();
        assert_eq!(store.ru_count(), 0);
        assert_eq!(store.ue_count(), 0);
    }
}
