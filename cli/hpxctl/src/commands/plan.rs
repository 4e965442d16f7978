//! Offline planning against a telemetry snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hpx_id::RuId;
use hpx_planner::{PlanReport, Planner, PlannerConfig, ReservationPolicy, RunOutcome, Verdict};
use hpx_telemetry::TelemetryDump;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{
    print_heading, print_info, print_json, print_success, print_table, OutputFormat,
};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct PlanCommand {
    /// JSON telemetry dump (`{"rus": [...], "ues": [...]}`).
    #[arg(long)]
    snapshot: PathBuf,

    /// Reservation policy (transactional or eager).
    #[arg(long, default_value = "transactional")]
    policy: ReservationPolicy,

    /// RUs to investigate for sleep.
    #[arg(required = true)]
    rus: Vec<RuId>,
}

#[derive(Debug, Tabled)]
struct VerdictRow {
    #[tabled(rename = "RU")]
    ru: String,

    #[tabled(rename = "Fame")]
    fame: u32,

    #[tabled(rename = "Verdict")]
    verdict: String,

    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Debug, Tabled)]
struct HandoverRow {
    #[tabled(rename = "UE")]
    ue: String,

    #[tabled(rename = "From")]
    origin: String,

    #[tabled(rename = "To")]
    destination: String,
}

impl PlanCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let path = self.snapshot.display().to_string();
        let raw = std::fs::read_to_string(&self.snapshot)
            .map_err(|e| CliError::snapshot(&path, e))?;
        let store = TelemetryDump::from_json(&raw)
            .map_err(|e| CliError::snapshot(&path, e))?
            .to_store()
            .map_err(|e| CliError::snapshot(&path, e))?;

        let planner = Planner::new(PlannerConfig {
            policy: self.policy,
            ..PlannerConfig::default()
        });
        let report = planner.plan(&store, &self.rus).await;

        match ctx.format {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Table => print_report(&report),
        }
        Ok(())
    }
}

fn print_report(report: &PlanReport) {
    if report.outcome != RunOutcome::Planned {
        print_info(&format!("Run ended early: {}", report.outcome.as_str()));
        return;
    }

    print_heading("Verdicts");
    print_table(&verdict_rows(report), "No candidates evaluated.");

    println!();
    print_heading("Handovers");
    print_table(&handover_rows(report), "No handovers.");

    println!();
    if report.plan.is_empty() {
        print_info("Empty plan; the xApp would not send a message.");
    } else {
        print_success(&format!("Payload: {}", report.payload()));
    }
}

fn verdict_rows(report: &PlanReport) -> Vec<VerdictRow> {
    report
        .verdicts
        .iter()
        .map(|v| {
            let (verdict, detail) = match &v.verdict {
                Verdict::Asleep { moved } => ("asleep", format!("{moved} UE(s) moved")),
                Verdict::Rejected { reason } => ("kept", reason.to_string()),
            };
            VerdictRow {
                ru: v.ru.to_string(),
                fame: v.fame,
                verdict: verdict.to_string(),
                detail,
            }
        })
        .collect()
}

fn handover_rows(report: &PlanReport) -> Vec<HandoverRow> {
    report
        .plan
        .iter()
        .map(|(ue, handover)| HandoverRow {
            ue: ue.to_string(),
            origin: handover.origin.to_string(),
            destination: handover.destination.to_string(),
        })
        .collect()
}
