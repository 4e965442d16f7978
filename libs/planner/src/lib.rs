//! RU sleep planning.
//!
//! Given the RUs named in an investigate request, the planner decides which
//! of them can be powered down by handing their UEs over to neighbouring
//! RUs with enough spare resource blocks. One run is a single pass:
//!
//! 1. [`snapshot`]: fetch the latest reading of every RU and UE involved,
//!    once each, each fetch bounded by a timeout
//! 2. [`fame`]: count how often each RU is visible to the UEs being
//!    investigated, and seed the capacity ledger
//! 3. [`rank`]: order candidates from least to most famous
//! 4. [`engine`]: greedy first-fit reallocation, one RU at a time
//! 5. [`plan`]: the resulting UE → (origin, destination) handovers
//!
//! # Invariants
//!
//! - Decisions are deterministic given the same telemetry
//! - A destination is only charged after a sufficiency check
//! - No UE is assigned twice and a sleeping RU never receives a UE
//! - Telemetry failures are local: an entity that cannot be read contributes
//!   nothing, and the run still produces a (possibly empty) plan

mod config;
pub mod engine;
pub mod fame;
pub mod plan;
pub mod rank;
mod report;
pub mod snapshot;

pub use config::{PlannerConfig, PolicyParseError, ReservationPolicy};
pub use engine::{RejectReason, RuVerdict, Verdict};
pub use fame::{CapacityLedger, FameIndex};
pub use plan::{Handover, HandoverPlan, EMPTY_PAYLOAD};
pub use rank::RankedRu;
pub use report::{PlanReport, RunOutcome};
pub use snapshot::Snapshot;

use hpx_id::RuId;
use hpx_telemetry::TelemetryAccessor;
use tracing::{debug, info, instrument, warn};

/// Runs sleep-planning passes against a telemetry accessor.
///
/// A planner holds no per-run state; concurrent calls to [`Planner::plan`]
/// each build their own snapshot, ledger, and plan.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run one decision pass for the given investigation set.
    #[instrument(skip(self, accessor, investigate), fields(requested = investigate.len()))]
    pub async fn plan<A>(&self, accessor: &A, investigate: &[RuId]) -> PlanReport
    where
        A: TelemetryAccessor + ?Sized,
    {
        if investigate.is_empty() {
            debug!("Empty investigation set");
            return PlanReport::empty(RunOutcome::EmptyInvestigationSet);
        }

        let collect = snapshot::collect(accessor, investigate, self.config.fetch_timeout);
        let snapshot = match tokio::time::timeout(self.config.run_deadline, collect).await {
            Ok(snapshot) => snapshot,
            Err(_) => {
                warn!(
                    deadline_ms = self.config.run_deadline.as_millis() as u64,
                    "Telemetry collection exceeded run deadline, abandoning run"
                );
                return PlanReport::empty(RunOutcome::DeadlineExceeded);
            }
        };

        self.plan_snapshot(&snapshot)
    }

    /// Plan against an already collected snapshot.
    pub fn plan_snapshot(&self, snapshot: &Snapshot) -> PlanReport {
        if snapshot.is_empty() {
            info!("No RU telemetry found for investigation set");
            return PlanReport::empty(RunOutcome::NoTelemetry);
        }

        let (fame, ledger) = fame::build_index(snapshot);
        let order = rank::sleep_order(&fame, snapshot.investigated());
        let output =
            engine::ReallocationEngine::new(snapshot, ledger, self.config.policy).run(&order);

        let report = PlanReport {
            outcome: RunOutcome::Planned,
            plan: output.plan,
            verdicts: output.verdicts,
            fame,
            ledger: output.ledger,
        };

        info!(
            candidates = order.len(),
            asleep = report.asleep().count(),
            handovers = report.plan.len(),
            policy = %self.config.policy,
            "Sleep planning pass complete"
        );

        report
    }
}
