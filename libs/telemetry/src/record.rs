//! Latest-reading records for radio units and user equipment.

use hpx_id::{RuId, UeId};
use serde::{Deserialize, Serialize};

use crate::{TelemetryError, TelemetryResult};

/// Latest known state of a radio unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuRecord {
    pub id: RuId,

    /// Spare resource blocks. May be negative when the RU is overcommitted.
    pub free_prb: i64,

    /// Attached UEs in reported order, without duplicates.
    pub connections: Vec<UeId>,
}

impl RuRecord {
    pub fn new(id: RuId, free_prb: i64, connections: Vec<UeId>) -> Self {
        Self {
            id,
            free_prb,
            connections,
        }
    }
}

/// Latest known state of a user equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeRecord {
    pub id: UeId,

    /// Resource blocks required to stay served.
    pub demand: i64,

    /// Radio-visible RUs in reported order, without duplicates.
    pub near_rus: Vec<RuId>,
}

impl UeRecord {
    /// Build a UE record, rejecting negative demand.
    pub fn new(id: UeId, demand: i64, near_rus: Vec<RuId>) -> TelemetryResult<Self> {
        if demand < 0 {
            return Err(TelemetryError::malformed(
                id.as_str(),
                format!("negative demand {demand}"),
            ));
        }
        Ok(Self {
            id,
            demand,
            near_rus,
        })
    }
}
