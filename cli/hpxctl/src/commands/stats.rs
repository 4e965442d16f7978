//! Counters of a running xApp.

use anyhow::Result;
use clap::Args;
use hpx_xapp::stats::StatsSnapshot;
use tabled::Tabled;

use crate::output::{print_json, print_table, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct StatsCommand {}

#[derive(Debug, Tabled)]
struct CounterRow {
    #[tabled(rename = "Counter")]
    name: &'static str,

    #[tabled(rename = "Value")]
    value: u64,
}

impl StatsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let stats: StatsSnapshot = ctx.client()?.get("/stats").await?;

        match ctx.format {
            OutputFormat::Json => print_json(&stats),
            OutputFormat::Table => print_table(&counter_rows(&stats), "No counters."),
        }
        Ok(())
    }
}

fn counter_rows(stats: &StatsSnapshot) -> Vec<CounterRow> {
    vec![
        CounterRow { name: "PredictRequests", value: stats.predict_requests },
        CounterRow { name: "HandoversSent", value: stats.handovers_sent },
        CounterRow { name: "Suppressed", value: stats.suppressed },
        CounterRow { name: "SendFailures", value: stats.send_failures },
        CounterRow { name: "Ignored", value: stats.ignored },
        CounterRow { name: "Rejected", value: stats.rejected },
    ]
}
