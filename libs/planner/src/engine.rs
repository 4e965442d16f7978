//! Greedy reallocation engine.
//!
//! Candidates are evaluated one at a time in rank order; each ends
//! `Committed` (asleep) or `Rejected`. For every UE attached to the
//! candidate, the UE's neighbour list is scanned in order and the first RU
//! that is neither the candidate nor asleep and has enough remaining
//! capacity is taken (first fit, not best fit). One UE without a destination
//! rejects the whole candidate, and none of its moves reach the plan.
//!
//! Under [`ReservationPolicy::Transactional`] the candidate's reservations
//! are staged and charged to the ledger only on commit. Under
//! [`ReservationPolicy::Eager`] each reservation is charged when
//! found and stays charged if the candidate is rejected.
//!
//! An RU that has received UEs in this run is never put to sleep.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use hpx_id::{RuId, UeId};
use hpx_telemetry::UeRecord;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{CapacityLedger, Handover, HandoverPlan, RankedRu, ReservationPolicy, Snapshot};

/// Why a candidate could not be slept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// No neighbour of this UE had room for it.
    NoDestination { ue: UeId, demand: i64 },

    /// The attached UE could not be read, so its needs are unknown.
    UeTelemetryMissing { ue: UeId },

    /// The UE already has a move in this run (it is listed on two RUs).
    UeAlreadyPlanned { ue: UeId },

    /// The RU is the destination of a committed move.
    ReceivingHandovers,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDestination { ue, demand } => {
                write!(f, "no destination with {demand} free PRB for {ue}")
            }
            Self::UeTelemetryMissing { ue } => write!(f, "no telemetry for {ue}"),
            Self::UeAlreadyPlanned { ue } => write!(f, "{ue} already handed over"),
            Self::ReceivingHandovers => f.write_str("receiving handovers"),
        }
    }
}

/// Final state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Verdict {
    Asleep { moved: usize },
    Rejected { reason: RejectReason },
}

impl Verdict {
    pub fn is_asleep(&self) -> bool {
        matches!(self, Self::Asleep { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuVerdict {
    pub ru: RuId,
    pub fame: u32,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// What a run of the engine produced.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub plan: HandoverPlan,
    pub verdicts: Vec<RuVerdict>,
    pub ledger: CapacityLedger,
}

/// Moves found for the candidate under evaluation.
#[derive(Debug, Default)]
struct Staging {
    moves: Vec<(UeId, Handover, i64)>,
    held: HashMap<RuId, i64>,
}

impl Staging {
    fn held(&self, ru: &RuId) -> i64 {
        self.held.get(ru).copied().unwrap_or(0)
    }

    fn contains(&self, ue: &UeId) -> bool {
        self.moves.iter().any(|(staged, _, _)| staged == ue)
    }

    fn hold(&mut self, ue: UeId, handover: Handover, demand: i64) {
        *self.held.entry(handover.destination.clone()).or_insert(0) += demand;
        self.moves.push((ue, handover, demand));
    }

    fn demand(&self) -> i64 {
        self.moves
            .iter()
            .fold(0i64, |total, (_, _, demand)| total.saturating_add(*demand))
    }
}

/// Single-run reallocation state. Owns its ledger; never shared.
pub struct ReallocationEngine<'a> {
    snapshot: &'a Snapshot,
    policy: ReservationPolicy,
    ledger: CapacityLedger,
    asleep: HashSet<RuId>,
    receiving: HashSet<RuId>,
    moves: BTreeMap<UeId, Handover>,
}

impl<'a> ReallocationEngine<'a> {
    pub fn new(snapshot: &'a Snapshot, ledger: CapacityLedger, policy: ReservationPolicy) -> Self {
        Self {
            snapshot,
            policy,
            ledger,
            asleep: HashSet::new(),
            receiving: HashSet::new(),
            moves: BTreeMap::new(),
        }
    }

    /// Evaluate candidates in the given order.
    pub fn run(mut self, order: &[RankedRu]) -> EngineOutput {
        let mut verdicts = Vec::with_capacity(order.len());

        for candidate in order {
            if self.asleep.contains(&candidate.id) {
                continue;
            }

            let verdict = self.evaluate(&candidate.id);
            match &verdict {
                Verdict::Asleep { moved } => debug!(
                    ru_id = %candidate.id,
                    fame = candidate.fame,
                    moved,
                    "RU can sleep"
                ),
                Verdict::Rejected { reason } => debug!(
                    ru_id = %candidate.id,
                    fame = candidate.fame,
                    reason = %reason,
                    "RU must stay awake"
                ),
            }

            verdicts.push(RuVerdict {
                ru: candidate.id.clone(),
                fame: candidate.fame,
                verdict,
            });
        }

        EngineOutput {
            plan: HandoverPlan::from_moves(self.moves),
            verdicts,
            ledger: self.ledger,
        }
    }

    fn evaluate(&mut self, ru: &RuId) -> Verdict {
        if self.receiving.contains(ru) {
            return Verdict::Rejected {
                reason: RejectReason::ReceivingHandovers,
            };
        }

        let snapshot = self.snapshot;
        let connections = snapshot
            .ru(ru)
            .map(|record| record.connections.as_slice())
            .unwrap_or_default();

        let mut staging = Staging::default();
        for ue_id in connections {
            if self.moves.contains_key(ue_id) || staging.contains(ue_id) {
                return self.reject(
                    ru,
                    &staging,
                    RejectReason::UeAlreadyPlanned { ue: ue_id.clone() },
                );
            }

            let Some(ue) = snapshot.ue(ue_id) else {
                return self.reject(
                    ru,
                    &staging,
                    RejectReason::UeTelemetryMissing { ue: ue_id.clone() },
                );
            };

            let Some(destination) = self.find_destination(ru, ue, &staging) else {
                return self.reject(
                    ru,
                    &staging,
                    RejectReason::NoDestination {
                        ue: ue_id.clone(),
                        demand: ue.demand,
                    },
                );
            };

            if self.policy == ReservationPolicy::Eager {
                self.ledger.reserve(&destination, ue.demand);
            }

            trace!(
                ue_id = %ue_id,
                from = %ru,
                to = %destination,
                demand = ue.demand,
                "Staged move"
            );
            staging.hold(
                ue_id.clone(),
                Handover {
                    origin: ru.clone(),
                    destination,
                },
                ue.demand,
            );
        }

        self.commit(ru, staging)
    }

    fn find_destination(&self, ru: &RuId, ue: &UeRecord, staging: &Staging) -> Option<RuId> {
        ue.near_rus
            .iter()
            .find(|candidate| {
                if *candidate == ru || self.asleep.contains(*candidate) {
                    return false;
                }
                let held = match self.policy {
                    ReservationPolicy::Transactional => staging.held(candidate),
                    ReservationPolicy::Eager => 0,
                };
                self.ledger
                    .remaining(candidate)
                    .is_some_and(|free| free - held >= ue.demand)
            })
            .cloned()
    }

    fn commit(&mut self, ru: &RuId, staging: Staging) -> Verdict {
        let moved = staging.moves.len();
        for (ue, handover, demand) in staging.moves {
            if self.policy == ReservationPolicy::Transactional {
                let charged = self.ledger.reserve(&handover.destination, demand);
                debug_assert!(charged, "staged capacity must still be available");
            }
            self.receiving.insert(handover.destination.clone());
            self.moves.insert(ue, handover);
        }
        self.asleep.insert(ru.clone());
        Verdict::Asleep { moved }
    }

    fn reject(&self, ru: &RuId, staging: &Staging, reason: RejectReason) -> Verdict {
        if self.policy == ReservationPolicy::Eager && !staging.moves.is_empty() {
            debug!(
                ru_id = %ru,
                retained_prb = staging.demand(),
                "Reservations of rejected RU stay charged"
            );
        }
        Verdict::Rejected { reason }
    }
}
