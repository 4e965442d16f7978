//! Message counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters updated by the dispatcher.
#[derive(Debug, Default)]
pub struct Stats {
    predict_requests: AtomicU64,
    handovers_sent: AtomicU64,
    suppressed: AtomicU64,
    send_failures: AtomicU64,
    ignored: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time copy of [`Stats`], as served by `GET /stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    /// Investigate requests that reached the planner.
    pub predict_requests: u64,
    pub handovers_sent: u64,

    /// Runs whose plan was empty.
    pub suppressed: u64,
    pub send_failures: u64,

    /// Messages of unknown type.
    pub ignored: u64,

    /// Investigate payloads that could not be parsed.
    pub rejected: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_predict_request(&self) {
        self.predict_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.handovers_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            predict_requests: self.predict_requests.load(Ordering::Relaxed),
            handovers_sent: self.handovers_sent.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_uses_pascal_case_keys() {
        let stats = Stats::new();
        stats.record_predict_request();
        stats.record_predict_request();
        stats.record_ignored();

        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["PredictRequests"], 2);
        assert_eq!(json["Ignored"], 1);
        assert_eq!(json["HandoversSent"], 0);
    }
}
