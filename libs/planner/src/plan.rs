//! Handover plans and their wire payload.
//!
//! The payload maps each UE to `"origin,destination"`:
//!
//! ```json
//! {"UE_7": "RU_10,RU_52"}
//! ```
//!
//! An empty plan serializes to [`EMPTY_PAYLOAD`]. Whoever owns the transport
//! decides not to send it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hpx_id::{RuId, UeId};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Payload of a plan with no handovers.
pub const EMPTY_PAYLOAD: &str = "{}";

/// One proposed UE move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handover {
    pub origin: RuId,
    pub destination: RuId,
}

impl fmt::Display for Handover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.origin, self.destination)
    }
}

/// UE → handover for one run, at most one entry per UE.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandoverPlan {
    moves: BTreeMap<UeId, Handover>,
}

impl HandoverPlan {
    pub(crate) fn from_moves(moves: BTreeMap<UeId, Handover>) -> Self {
        Self { moves }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn get(&self, ue: &UeId) -> Option<&Handover> {
        self.moves.get(ue)
    }

    /// Moves ordered by UE id.
    pub fn iter(&self) -> impl Iterator<Item = (&UeId, &Handover)> {
        self.moves.iter()
    }

    /// RUs that lose UEs under this plan.
    pub fn origins(&self) -> BTreeSet<&RuId> {
        self.moves.values().map(|h| &h.origin).collect()
    }

    /// RUs that gain UEs under this plan.
    pub fn destinations(&self) -> BTreeSet<&RuId> {
        self.moves.values().map(|h| &h.destination).collect()
    }

    /// Serialize as the outbound payload.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| EMPTY_PAYLOAD.to_string())
    }
}

impl Serialize for HandoverPlan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.moves.len()))?;
        for (ue, handover) in &self.moves {
            map.serialize_entry(ue.as_str(), &handover.to_string())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpx_testing::ids::{ru, ue};

    fn handover(origin: &str, destination: &str) -> Handover {
        Handover {
            origin: ru(origin),
            destination: ru(destination),
        }
    }

    #[test]
    fn test_empty_plan_payload() {
        assert_eq!(HandoverPlan::default().to_payload(), EMPTY_PAYLOAD);
    }

    #[test]
    fn test_payload_format() {
        let plan = HandoverPlan::from_moves(BTreeMap::from([
            (ue("UE_7"), handover("RU_10", "RU_52")),
            (ue("UE_1"), handover("RU_10", "RU_11")),
        ]));
        assert_eq!(
            plan.to_payload(),
            r#"{"UE_1":"RU_10,RU_11","UE_7":"RU_10,RU_52"}"#
        );
    }

    #[test]
    fn test_origins_and_destinations() {
        let plan = HandoverPlan::from_moves(BTreeMap::from([
            (ue("u1"), handover("A", "B")),
            (ue("u2"), handover("A", "C")),
        ]));
        assert_eq!(plan.origins().len(), 1);
        assert_eq!(plan.destinations().len(), 2);
    }
}
