//! Telemetry collection for one run.
//!
//! Every entity is fetched at most once per run, successful or not, so the
//! rest of the run works from a stable view even if the store is being
//! written concurrently. A failed or timed-out fetch is recorded as absent.

use std::collections::HashMap;
use std::time::Duration;

use hpx_id::{RuId, UeId};
use hpx_telemetry::list::dedup_ids;
use hpx_telemetry::{RuRecord, TelemetryAccessor, TelemetryError, TelemetryResult, UeRecord};
use tracing::{debug, warn};

/// Latest readings gathered for one planning run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    investigated: Vec<RuId>,
    rus: HashMap<RuId, Option<RuRecord>>,
    ues: HashMap<UeId, Option<UeRecord>>,
}

impl Snapshot {
    /// Investigated RUs that have RU telemetry, in request order.
    pub fn investigated(&self) -> &[RuId] {
        &self.investigated
    }

    pub fn ru(&self, id: &RuId) -> Option<&RuRecord> {
        self.rus.get(id).and_then(Option::as_ref)
    }

    pub fn ue(&self, id: &UeId) -> Option<&UeRecord> {
        self.ues.get(id).and_then(Option::as_ref)
    }

    /// True when none of the investigated RUs had telemetry.
    pub fn is_empty(&self) -> bool {
        self.investigated.is_empty()
    }

    /// Number of fetches that were attempted, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.rus.len() + self.ues.len()
    }

    /// Build a snapshot from records already in hand.
    ///
    /// `investigate` is filtered to the RUs present in `rus`.
    pub fn from_records(
        investigate: &[RuId],
        rus: impl IntoIterator<Item = RuRecord>,
        ues: impl IntoIterator<Item = UeRecord>,
    ) -> Self {
        let rus: HashMap<RuId, Option<RuRecord>> =
            rus.into_iter().map(|r| (r.id.clone(), Some(r))).collect();
        let ues = ues.into_iter().map(|u| (u.id.clone(), Some(u))).collect();
        let investigated = dedup_ids(investigate.iter().cloned())
            .into_iter()
            .filter(|id| matches!(rus.get(id), Some(Some(_))))
            .collect();
        Self {
            investigated,
            rus,
            ues,
        }
    }
}

/// Collect the readings a run needs.
///
/// Fetches each investigated RU, then every UE attached to it, then every RU
/// those UEs can see.
pub async fn collect<A>(accessor: &A, investigate: &[RuId], fetch_timeout: Duration) -> Snapshot
where
    A: TelemetryAccessor + ?Sized,
{
    let mut collector = Collector {
        accessor,
        fetch_timeout,
        snapshot: Snapshot::default(),
    };

    for ru in dedup_ids(investigate.iter().cloned()) {
        if collector.fetch_ru(&ru).await {
            collector.snapshot.investigated.push(ru);
        }
    }

    let investigated = collector.snapshot.investigated.clone();
    for ru in &investigated {
        let connections = collector
            .snapshot
            .ru(ru)
            .map(|r| r.connections.clone())
            .unwrap_or_default();

        for ue in &connections {
            if !collector.fetch_ue(ue).await {
                continue;
            }
            let near_rus = collector
                .snapshot
                .ue(ue)
                .map(|u| u.near_rus.clone())
                .unwrap_or_default();
            for near in &near_rus {
                collector.fetch_ru(near).await;
            }
        }
    }

    debug!(
        investigated = collector.snapshot.investigated.len(),
        fetches = collector.snapshot.fetch_count(),
        "Telemetry snapshot collected"
    );

    collector.snapshot
}

struct Collector<'a, A: ?Sized> {
    accessor: &'a A,
    fetch_timeout: Duration,
    snapshot: Snapshot,
}

impl<A: TelemetryAccessor + ?Sized> Collector<'_, A> {
    /// Returns true if the RU has a usable reading.
    async fn fetch_ru(&mut self, id: &RuId) -> bool {
        if let Some(known) = self.snapshot.rus.get(id) {
            return known.is_some();
        }
        let read = bounded(
            self.fetch_timeout,
            id.as_str(),
            self.accessor.latest_ru(id),
        )
        .await;
        let record = log_failure(id.as_str(), RuId::KIND, read);
        let found = record.is_some();
        self.snapshot.rus.insert(id.clone(), record);
        found
    }

    /// Returns true if the UE has a usable reading.
    async fn fetch_ue(&mut self, id: &UeId) -> bool {
        if let Some(known) = self.snapshot.ues.get(id) {
            return known.is_some();
        }
        let read = bounded(
            self.fetch_timeout,
            id.as_str(),
            self.accessor.latest_ue(id),
        )
        .await;
        let record = log_failure(id.as_str(), UeId::KIND, read);
        let found = record.is_some();
        self.snapshot.ues.insert(id.clone(), record);
        found
    }
}

async fn bounded<T>(
    limit: Duration,
    id: &str,
    read: impl std::future::Future<Output = TelemetryResult<T>>,
) -> TelemetryResult<T> {
    match tokio::time::timeout(limit, read).await {
        Ok(result) => result,
        Err(_) => Err(TelemetryError::Timeout {
            id: id.to_string(),
            after: limit,
        }),
    }
}

fn log_failure<T>(id: &str, kind: &'static str, read: TelemetryResult<T>) -> Option<T> {
    match read {
        Ok(record) => Some(record),
        Err(e) if e.is_not_found() => {
            debug!(entity = kind, id, "No telemetry for entity");
            None
        }
        Err(e) => {
            warn!(
                entity = kind,
                id,
                category = e.category(),
                error = %e,
                "Telemetry read failed, entity contributes nothing"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpx_testing::{ids, FlakyTelemetry, Scenario};

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_collect_fetches_each_entity_once() {
        // u1 and u2 both see B; A is investigated twice
        let store = Scenario::new()
            .ru("A", 0, &["u1", "u2"])
            .ru("B", 5, &[])
            .ue("u1", 1, &["A", "B"])
            .ue("u2", 1, &["B", "A"])
            .build();
        let flaky = FlakyTelemetry::new(store);

        let snapshot = collect(&flaky, &ids::rus(&["A", "A"]), TIMEOUT).await;

        assert_eq!(snapshot.investigated(), ids::rus(&["A"]).as_slice());
        assert_eq!(flaky.reads("A"), 1);
        assert_eq!(flaky.reads("B"), 1);
        assert_eq!(flaky.reads("u1"), 1);
        assert_eq!(flaky.total_reads(), 4);
    }

    #[tokio::test]
    async fn test_collect_skips_investigated_without_data() {
        let store = Scenario::new().ru("A", 3, &[]).build();
        let snapshot = collect(&store, &ids::rus(&["X", "A"]), TIMEOUT).await;
        assert_eq!(snapshot.investigated(), ids::rus(&["A"]).as_slice());
        assert!(snapshot.ru(&ids::ru("X")).is_none());
    }

    #[tokio::test]
    async fn test_collect_failed_fetch_is_not_retried() {
        let store = Scenario::new()
            .ru("A", 0, &["u1", "u2"])
            .ue("u1", 1, &["B"])
            .ue("u2", 1, &["B"])
            .ru("B", 5, &[])
            .build();
        let flaky = FlakyTelemetry::new(store).fail("B");

        let snapshot = collect(&flaky, &ids::rus(&["A"]), TIMEOUT).await;

        assert!(snapshot.ru(&ids::ru("B")).is_none());
        assert_eq!(flaky.reads("B"), 1);
    }

    #[tokio::test]
    async fn test_collect_times_out_slow_reads() {
        let store = Scenario::new()
            .ru("A", 0, &["u1"])
            .ue("u1", 1, &["B"])
            .ru("B", 5, &[])
            .build();
        let flaky = FlakyTelemetry::new(store).delay("u1", Duration::from_secs(5));

        let snapshot = collect(&flaky, &ids::rus(&["A"]), Duration::from_millis(20)).await;

        assert!(snapshot.ue(&ids::ue("u1")).is_none());
        assert_eq!(flaky.reads("B"), 0);
    }

    #[test]
    fn test_from_records_filters_investigation_set() {
        let snapshot = Snapshot::from_records(
            &ids::rus(&["A", "B"]),
            vec![RuRecord::new(ids::ru("B"), 1, vec![])],
            vec![],
        );
        assert_eq!(snapshot.investigated(), ids::rus(&["B"]).as_slice());
    }
}
