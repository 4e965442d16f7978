//! Comma-joined id lists.
//!
//! The telemetry store writes lists as ids joined by `,` with a trailing
//! separator (`"UE_1,UE_2,"`). Empty segments are ignored and a repeated id
//! keeps its first position.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use hpx_id::IdError;

/// List entry separator.
pub const SEPARATOR: char = ',';

/// Parse a comma-joined list into ordered, de-duplicated ids.
pub fn parse_id_list<T>(raw: &str) -> Result<Vec<T>, IdError>
where
    T: FromStr<Err = IdError> + Eq + Hash + Clone,
{
    let mut ids = Vec::new();
    for segment in raw.split(SEPARATOR) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        ids.push(segment.parse::<T>()?);
    }
    Ok(dedup_ids(ids))
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_ids<T>(ids: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Format ids in the store's encoding, trailing separator included.
pub fn format_id_list<T: Display>(ids: &[T]) -> String {
    ids.iter().map(|id| format!("{id}{SEPARATOR}")).collect()
}
