//! Investigate request against a running xApp.

use anyhow::Result;
use clap::Args;
use hpx_id::RuId;
use hpx_xapp::messaging::InvestigateRequest;
use hpx_xapp::HP_INVESTIGATE;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct InvestigateCommand {
    /// RUs to investigate for sleep.
    rus: Vec<RuId>,
}

/// Dispatch outcome as returned by the xApp.
#[derive(Debug, Serialize, Deserialize)]
struct DispatchReply {
    message_type: u32,
    outcome: String,
    #[serde(flatten)]
    detail: Map<String, Value>,
}

impl InvestigateCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;
        let payload = serde_json::to_string(&InvestigateRequest::new(self.rus))?;

        let reply: DispatchReply = client.post_message(HP_INVESTIGATE, payload).await?;

        match ctx.format {
            OutputFormat::Json => print_json(&reply),
            OutputFormat::Table => print_reply(&reply),
        }
        Ok(())
    }
}

fn print_reply(reply: &DispatchReply) {
    let detail = |key: &str| match reply.detail.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    match reply.outcome.as_str() {
        "sent" => print_success(&format!("Sent {} handover(s)", detail("handovers"))),
        "suppressed" => print_info(&format!("Empty plan, nothing sent ({})", detail("run"))),
        "send_failed" => {
            print_warning(&format!("Plan built but not delivered: {}", detail("error")))
        }
        "rejected" => print_warning(&format!("Request rejected: {}", detail("error"))),
        other => print_info(&format!("Outcome: {other}")),
    }
}
