//! Result of one planning run.

use hpx_id::RuId;
use serde::Serialize;

use crate::{CapacityLedger, FameIndex, HandoverPlan, RuVerdict, Verdict};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The engine evaluated the candidates. The plan may still be empty.
    Planned,

    /// The request named no RUs.
    EmptyInvestigationSet,

    /// None of the requested RUs had telemetry.
    NoTelemetry,

    /// Telemetry collection ran past the run deadline.
    DeadlineExceeded,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::EmptyInvestigationSet => "empty_investigation_set",
            Self::NoTelemetry => "no_telemetry",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

/// Plan plus the evidence behind it.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub outcome: RunOutcome,
    pub plan: HandoverPlan,

    /// One entry per evaluated RU, in evaluation order.
    pub verdicts: Vec<RuVerdict>,

    pub fame: FameIndex,

    /// Ledger state after the run.
    pub ledger: CapacityLedger,
}

impl PlanReport {
    pub(crate) fn empty(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            plan: HandoverPlan::default(),
            verdicts: Vec::new(),
            fame: FameIndex::default(),
            ledger: CapacityLedger::default(),
        }
    }

    /// RUs marked asleep, in evaluation order.
    pub fn asleep(&self) -> impl Iterator<Item = &RuId> {
        self.verdicts
            .iter()
            .filter(|v| matches!(v.verdict, Verdict::Asleep { .. }))
            .map(|v| &v.ru)
    }

    pub fn payload(&self) -> String {
        self.plan.to_payload()
    }
}
