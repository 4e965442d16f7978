//! Message types and dispatch.
//!
//! Every inbound message is routed by its numeric type. `HP_INVESTIGATE`
//! runs the planner and answers with `HP_HANDOVERS`; anything else goes to
//! the default handler, which drops it.

mod investigate;

use std::sync::Arc;

use hpx_planner::{Planner, RunOutcome, EMPTY_PAYLOAD};
use hpx_telemetry::TelemetryAccessor;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

pub use investigate::InvestigateRequest;

use crate::stats::{Stats, StatsSnapshot};
use crate::transport::MessageSender;

/// Inbound request naming RUs to investigate for sleep.
pub const HP_INVESTIGATE: u32 = 30036;

/// Outbound handover plan.
pub const HP_HANDOVERS: u32 = 30037;

/// What the dispatcher did with one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// A non-empty plan was delivered as `HP_HANDOVERS`.
    Sent { handovers: usize },

    /// The plan was empty, so nothing was sent.
    Suppressed { run: RunOutcome },

    /// The plan could not be delivered.
    SendFailed { handovers: usize, error: String },

    /// The payload could not be parsed.
    Rejected { error: String },

    /// No handler for this message type.
    Ignored,
}

/// Routes messages to handlers.
pub struct Dispatcher {
    planner: Planner,
    telemetry: Arc<dyn TelemetryAccessor>,
    sender: Arc<dyn MessageSender>,
    stats: Stats,
}

impl Dispatcher {
    pub fn new(
        planner: Planner,
        telemetry: Arc<dyn TelemetryAccessor>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            planner,
            telemetry,
            sender,
            stats: Stats::new(),
        }
    }

    pub fn telemetry(&self) -> &dyn TelemetryAccessor {
        self.telemetry.as_ref()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn dispatch(&self, message_type: u32, payload: &[u8]) -> DispatchOutcome {
        match message_type {
            HP_INVESTIGATE => self.handle_investigate(payload).await,
            other => self.handle_default(other, payload),
        }
    }

    #[instrument(skip(self, payload), fields(message_type = HP_INVESTIGATE))]
    async fn handle_investigate(&self, payload: &[u8]) -> DispatchOutcome {
        let request = match InvestigateRequest::from_payload(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Dropping malformed investigate request");
                self.stats.record_rejected();
                return DispatchOutcome::Rejected {
                    error: e.to_string(),
                };
            }
        };

        self.stats.record_predict_request();
        info!(rus = request.ru_prediction_set.len(), "Investigate request received");

        let report = self
            .planner
            .plan(self.telemetry.as_ref(), &request.ru_prediction_set)
            .await;
        let payload = report.payload();

        if payload == EMPTY_PAYLOAD {
            info!(run = report.outcome.as_str(), "Empty handover prediction, not sending");
            self.stats.record_suppressed();
            return DispatchOutcome::Suppressed {
                run: report.outcome,
            };
        }

        let handovers = report.plan.len();
        match self.sender.send(HP_HANDOVERS, &payload).await {
            Ok(()) => {
                info!(handovers, payload = %payload, "Handover prediction sent");
                self.stats.record_sent();
                DispatchOutcome::Sent { handovers }
            }
            Err(e) => {
                warn!(handovers, error = %e, "Failed to send handover prediction");
                self.stats.record_send_failure();
                DispatchOutcome::SendFailed {
                    handovers,
                    error: e.to_string(),
                }
            }
        }
    }

    fn handle_default(&self, message_type: u32, payload: &[u8]) -> DispatchOutcome {
        debug!(message_type, len = payload.len(), "No handler for message type, dropping");
        self.stats.record_ignored();
        DispatchOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use hpx_testing::Scenario;

    use super::*;
    use crate::transport::MemorySender;

    fn dispatcher(sender: Arc<MemorySender>) -> Dispatcher {
        let store = Scenario::new()
            .ru("RU_1", 0, &["UE_1"])
            .ue("UE_1", 3, &["RU_2"])
            .ru("RU_2", 10, &[])
            .shared();
        Dispatcher::new(Planner::default(), store, sender)
    }

    #[tokio::test]
    async fn test_investigate_sends_plan() {
        let sender = Arc::new(MemorySender::new());
        let dispatcher = dispatcher(sender.clone());

        let outcome = dispatcher
            .dispatch(HP_INVESTIGATE, br#"{"RUPredictionSet":["RU_1"]}"#)
            .await;

        assert_eq!(outcome, DispatchOutcome::Sent { handovers: 1 });
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message_type, HP_HANDOVERS);
        assert_eq!(sent[0].payload, r#"{"UE_1":"RU_1,RU_2"}"#);
        assert_eq!(dispatcher.stats().predict_requests, 1);
        assert_eq!(dispatcher.stats().handovers_sent, 1);
    }

    #[tokio::test]
    async fn test_empty_plan_is_suppressed() {
        let sender = Arc::new(MemorySender::new());
        let dispatcher = dispatcher(sender.clone());

        let outcome = dispatcher
            .dispatch(HP_INVESTIGATE, br#"{"RUPredictionSet":["RU_9"]}"#)
            .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Suppressed {
                run: RunOutcome::NoTelemetry
            }
        );
        assert!(sender.sent().is_empty());
        assert_eq!(dispatcher.stats().suppressed, 1);
    }

    #[tokio::test]
    async fn test_unknown_type_goes_to_default_handler() {
        let sender = Arc::new(MemorySender::new());
        let dispatcher = dispatcher(sender.clone());

        assert_eq!(dispatcher.dispatch(12345, b"{}").await, DispatchOutcome::Ignored);
        assert_eq!(dispatcher.stats().ignored, 1);
        assert_eq!(dispatcher.stats().predict_requests, 0);
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let store = Scenario::new()
            .ru("RU_1", 0, &["UE_1"])
            .ue("UE_1", 3, &["RU_2"])
            .ru("RU_2", 10, &[])
            .shared();
        let dispatcher =
            Dispatcher::new(Planner::default(), store, Arc::new(MemorySender::failing()));

        let outcome = dispatcher
            .dispatch(HP_INVESTIGATE, br#"{"RUPredictionSet":["RU_1"]}"#)
            .await;

        assert!(matches!(outcome, DispatchOutcome::SendFailed { handovers: 1, .. }));
        assert_eq!(dispatcher.stats().send_failures, 1);
    }
}
