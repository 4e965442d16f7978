//! Test fixtures for the handover planner.
//!
//! - [`ids`]: terse id constructors (`ru("A")`, `ues(&["u1", "u2"])`)
//! - [`Scenario`]: builds an in-memory telemetry store
//! - [`FlakyTelemetry`]: wraps an accessor to fail, stall, and count reads

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hpx_id::{RuId, UeId};
use hpx_telemetry::{
    InMemoryTelemetry, RuRecord, TelemetryAccessor, TelemetryError, TelemetryResult, UeRecord,
};

pub mod ids {
    //! Id constructors that panic on invalid input. Tests only.

    use hpx_id::{RuId, UeId};

    pub fn ru(id: &str) -> RuId {
        RuId::parse(id).unwrap_or_else(|e| panic!("bad RU id {id:?}: {e}"))
    }

    pub fn ue(id: &str) -> UeId {
        UeId::parse(id).unwrap_or_else(|e| panic!("bad UE id {id:?}: {e}"))
    }

    pub fn rus(ids: &[&str]) -> Vec<RuId> {
        ids.iter().map(|id| ru(id)).collect()
    }

    pub fn ues(ids: &[&str]) -> Vec<UeId> {
        ids.iter().map(|id| ue(id)).collect()
    }
}

/// Builder for an in-memory telemetry store.
///
/// ```ignore
/// let store = Scenario::new()
///     .ru("A", 0, &["u1"])
///     .ue("u1", 2, &["B"])
///     .ru("B", 5, &[])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct Scenario {
    store: InMemoryTelemetry,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ru(mut self, id: &str, free_prb: i64, connections: &[&str]) -> Self {
        self.store
            .insert_ru(RuRecord::new(ids::ru(id), free_prb, ids::ues(connections)));
        self
    }

    pub fn ue(mut self, id: &str, demand: i64, near_rus: &[&str]) -> Self {
        let record = UeRecord::new(ids::ue(id), demand, ids::rus(near_rus))
            .unwrap_or_else(|e| panic!("bad UE fixture {id:?}: {e}"));
        self.store.insert_ue(record);
        self
    }

    pub fn malformed_ru(mut self, id: &str, reason: &str) -> Self {
        self.store.insert_malformed_ru(ids::ru(id), reason);
        self
    }

    pub fn malformed_ue(mut self, id: &str, reason: &str) -> Self {
        self.store.insert_malformed_ue(ids::ue(id), reason);
        self
    }

    pub fn build(self) -> InMemoryTelemetry {
        self.store
    }

    pub fn shared(self) -> Arc<InMemoryTelemetry> {
        Arc::new(self.store)
    }
}

/// Accessor wrapper that injects failures and latency and counts reads.
///
/// Ids are matched by their string form, for RUs and UEs alike.
#[derive(Debug)]
pub struct FlakyTelemetry<A> {
    inner: A,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    unhealthy: bool,
    reads: Mutex<HashMap<String, usize>>,
}

impl<A: TelemetryAccessor> FlakyTelemetry<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            delays: HashMap::new(),
            unhealthy: false,
            reads: Mutex::new(HashMap::new()),
        }
    }

    /// Reads of `id` fail as unavailable.
    pub fn fail(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    /// Reads of `id` sleep before answering.
    pub fn delay(mut self, id: &str, by: Duration) -> Self {
        self.delays.insert(id.to_string(), by);
        self
    }

    /// Health checks fail.
    pub fn unhealthy(mut self) -> Self {
        self.unhealthy = true;
        self
    }

    /// Number of reads of `id` so far.
    pub fn reads(&self, id: &str) -> usize {
        self.lock_reads().get(id).copied().unwrap_or(0)
    }

    pub fn total_reads(&self) -> usize {
        self.lock_reads().values().sum()
    }

    fn lock_reads(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.reads.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn intercept(&self, id: &str) -> TelemetryResult<()> {
        *self.lock_reads().entry(id.to_string()).or_insert(0) += 1;
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(id) {
            return Err(TelemetryError::unavailable(id, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl<A: TelemetryAccessor> TelemetryAccessor for FlakyTelemetry<A> {
    async fn latest_ru(&self, id: &RuId) -> TelemetryResult<RuRecord> {
        self.intercept(id.as_str()).await?;
        self.inner.latest_ru(id).await
    }

    async fn latest_ue(&self, id: &UeId) -> TelemetryResult<UeRecord> {
        self.intercept(id.as_str()).await?;
        self.inner.latest_ue(id).await
    }

    async fn health_check(&self) -> TelemetryResult<()> {
        if self.unhealthy {
            return Err(TelemetryError::unavailable("health", "injected failure"));
        }
        self.inner.health_check().await
    }
}
