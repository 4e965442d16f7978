//! Sleep-candidate ranking.
//!
//! Candidates are evaluated from least to most famous, so RUs that few UEs
//! depend on get the first claim on spare capacity. Ties are broken by
//! ascending RU id (byte-wise string order, so `RU_10` sorts before `RU_2`).

use std::cmp::Ordering;

use hpx_id::RuId;
use serde::Serialize;

use crate::FameIndex;

/// An RU with its fame, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRu {
    pub id: RuId,
    pub fame: u32,
}

fn by_fame_then_id(a: &RankedRu, b: &RankedRu) -> Ordering {
    a.fame.cmp(&b.fame).then_with(|| a.id.cmp(&b.id))
}

/// Every RU in the index, ascending by fame.
pub fn rank(fame: &FameIndex) -> Vec<RankedRu> {
    let mut ranked: Vec<RankedRu> = fame
        .iter()
        .map(|(id, fame)| RankedRu {
            id: id.clone(),
            fame,
        })
        .collect();
    ranked.sort_by(by_fame_then_id);
    ranked
}

/// Evaluation order for the given candidates.
///
/// Candidates that no UE can see rank with fame zero.
pub fn sleep_order(fame: &FameIndex, candidates: &[RuId]) -> Vec<RankedRu> {
    let mut ranked: Vec<RankedRu> = candidates
        .iter()
        .map(|id| RankedRu {
            id: id.clone(),
            fame: fame.get(id),
        })
        .collect();
    ranked.sort_by(by_fame_then_id);
    ranked.dedup_by(|a, b| a.id == b.id);
    ranked
}
