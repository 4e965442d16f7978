//! Fame index and capacity ledger.
//!
//! Fame counts, for every RU, how many times it appears in the neighbour
//! list of a UE attached to an investigated RU. The ledger holds the spare
//! resource blocks of every RU seen that way, and is the only state the
//! reallocation engine mutates.

use std::collections::BTreeMap;

use hpx_id::RuId;
use serde::Serialize;

use crate::Snapshot;

/// Neighbour-list appearance counts per RU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FameIndex {
    counts: BTreeMap<RuId, u32>,
}

impl FameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one appearance. Returns true on the RU's first appearance.
    pub fn vote(&mut self, ru: &RuId) -> bool {
        match self.counts.get_mut(ru) {
            Some(count) => {
                *count += 1;
                false
            }
            None => {
                self.counts.insert(ru.clone(), 1);
                true
            }
        }
    }

    /// Fame of an RU; zero if it never appeared.
    pub fn get(&self, ru: &RuId) -> u32 {
        self.counts.get(ru).copied().unwrap_or(0)
    }

    pub fn contains(&self, ru: &RuId) -> bool {
        self.counts.contains_key(ru)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuId, u32)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }
}

impl FromIterator<(RuId, u32)> for FameIndex {
    fn from_iter<I: IntoIterator<Item = (RuId, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Remaining spare resource blocks per RU for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapacityLedger {
    free: BTreeMap<RuId, i64>,
}

impl CapacityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an RU's capacity unless it is already known.
    pub fn seed(&mut self, ru: &RuId, free_prb: i64) {
        self.free.entry(ru.clone()).or_insert(free_prb);
    }

    /// Remaining capacity, or `None` for an RU without telemetry.
    pub fn remaining(&self, ru: &RuId) -> Option<i64> {
        self.free.get(ru).copied()
    }

    /// Charge `demand` to `ru` if it has room. Returns whether it did.
    pub fn reserve(&mut self, ru: &RuId, demand: i64) -> bool {
        match self.free.get_mut(ru) {
            Some(free) if *free >= demand => {
                *free -= demand;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuId, i64)> {
        self.free.iter().map(|(id, free)| (id, *free))
    }
}

/// Build the fame index and initial ledger from a snapshot.
///
/// Only investigated RUs' attached UEs vote. An RU enters the ledger on its
/// first appearance, if it has telemetry.
pub fn build_index(snapshot: &Snapshot) -> (FameIndex, CapacityLedger) {
    let mut fame = FameIndex::new();
    let mut ledger = CapacityLedger::new();

    for ru in snapshot.investigated() {
        let Some(record) = snapshot.ru(ru) else {
            continue;
        };
        for ue_id in &record.connections {
            let Some(ue) = snapshot.ue(ue_id) else {
                continue;
            };
            for near in &ue.near_rus {
                if fame.vote(near) {
                    if let Some(neighbour) = snapshot.ru(near) {
                        ledger.seed(near, neighbour.free_prb);
                    }
                }
            }
        }
    }

    (fame, ledger)
}
