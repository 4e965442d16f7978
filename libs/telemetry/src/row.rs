//! Decoding of raw telemetry rows into records.
//!
//! A row is a flat field map as returned by the store (or as written in a
//! [`crate::TelemetryDump`]). Required numeric fields that are missing or
//! non-integral make the record malformed; missing list fields decode as
//! empty lists.

use std::hash::Hash;
use std::str::FromStr;

use hpx_id::{IdError, RuId, UeId};
use serde_json::{Map, Value};

use crate::list::{dedup_ids, parse_id_list};
use crate::{RuRecord, TelemetryError, TelemetryResult, UeRecord};

/// Entity id column shared by both measurements.
pub const UID: &str = "uid";
pub const RU_FREE_PRB: &str = "free_PRB";
pub const RU_CONNECTIONS: &str = "connections";
pub const UE_DEMAND: &str = "demand";
pub const UE_NEAR_RU: &str = "near_RU";
/// Per-rank neighbour columns written by the simulator (`ru_close_0`, ...).
pub const UE_RU_CLOSE_PREFIX: &str = "ru_close_";

/// Decode an RU row.
pub fn decode_ru(id: &RuId, fields: &Map<String, Value>) -> TelemetryResult<RuRecord> {
    let free_prb = integer_field(id.as_str(), fields, RU_FREE_PRB)?;
    let connections = id_list_field(id.as_str(), fields.get(RU_CONNECTIONS))?;
    Ok(RuRecord::new(id.clone(), free_prb, connections))
}

/// Decode a UE row.
///
/// `near_RU` wins when present; otherwise the `ru_close_<i>` columns are
/// read in rank order.
pub fn decode_ue(id: &UeId, fields: &Map<String, Value>) -> TelemetryResult<UeRecord> {
    let demand = integer_field(id.as_str(), fields, UE_DEMAND)?;
    let near_rus = match fields.get(UE_NEAR_RU) {
        Some(value) if !value.is_null() => id_list_field(id.as_str(), Some(value))?,
        _ => ranked_columns(id.as_str(), fields)?,
    };
    UeRecord::new(id.clone(), demand, near_rus)
}

fn integer_field(id: &str, fields: &Map<String, Value>, name: &str) -> TelemetryResult<i64> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(TelemetryError::malformed(id, format!("missing {name}"))),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_i64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(TelemetryError::malformed(
                    id,
                    format!("{name} is not an integer: {n}"),
                )),
            }
        }
        Some(other) => Err(TelemetryError::malformed(
            id,
            format!("{name} is not numeric: {other}"),
        )),
    }
}

fn id_list_field<T>(id: &str, value: Option<&Value>) -> TelemetryResult<Vec<T>>
where
    T: FromStr<Err = IdError> + Eq + Hash + Clone,
{
    let bad_id = |e: IdError| TelemetryError::malformed(id, e.to_string());
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => parse_id_list(raw).map_err(bad_id),
        Some(Value::Array(items)) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(raw) = item else {
                    return Err(TelemetryError::malformed(
                        id,
                        format!("list entry is not a string: {item}"),
                    ));
                };
                ids.push(raw.parse::<T>().map_err(bad_id)?);
            }
            Ok(dedup_ids(ids))
        }
        Some(other) => Err(TelemetryError::malformed(
            id,
            format!("expected an id list, got {other}"),
        )),
    }
}

fn ranked_columns(id: &str, fields: &Map<String, Value>) -> TelemetryResult<Vec<RuId>> {
    let mut ranked: Vec<(usize, RuId)> = Vec::new();
    for (name, value) in fields {
        // ru_close_dist_<i> carries distances, not ids
        let Some(Ok(rank)) = name
            .strip_prefix(UE_RU_CLOSE_PREFIX)
            .map(str::parse::<usize>)
        else {
            continue;
        };
        match value {
            Value::Null => {}
            Value::String(raw) if raw.is_empty() => {}
            Value::String(raw) => {
                let ru = raw
                    .parse::<RuId>()
                    .map_err(|e| TelemetryError::malformed(id, e.to_string()))?;
                ranked.push((rank, ru));
            }
            other => {
                return Err(TelemetryError::malformed(
                    id,
                    format!("{name} is not an RU id: {other}"),
                ))
            }
        }
    }
    ranked.sort_by_key(|(rank, _)| *rank);
    Ok(dedup_ids(ranked.into_iter().map(|(_, ru)| ru)))
}
