//! CLI commands.

mod investigate;
mod plan;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::XappClient;
use crate::output::OutputFormat;

/// hpxctl - inspect and drive the handover prediction xApp.
#[derive(Debug, Parser)]
#[command(name = "hpxctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Base URL of a running xApp.
    #[arg(
        long,
        global = true,
        env = "HPX_XAPP_URL",
        default_value = "http://localhost:8080"
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan offline against a telemetry snapshot.
    Plan(plan::PlanCommand),

    /// Send an investigate request to a running xApp.
    Investigate(investigate::InvestigateCommand),

    /// Show a running xApp's message counters.
    Stats(stats::StatsCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            format: OutputFormat::parse(&self.format),
            url: self.url,
        };

        match self.command {
            Commands::Plan(cmd) => cmd.run(ctx).await,
            Commands::Investigate(cmd) => cmd.run(ctx).await,
            Commands::Stats(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("hpxctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub format: OutputFormat,
    pub url: String,
}

impl CommandContext {
    pub fn client(&self) -> Result<XappClient> {
        XappClient::new(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_arguments() {
        let cli = Cli::try_parse_from([
            "hpxctl",
            "--format",
            "json",
            "plan",
            "--snapshot",
            "dump.json",
            "--policy",
            "eager",
            "RU_1",
            "RU_2",
        ])
        .unwrap();
        assert_eq!(OutputFormat::parse(&cli.format), OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Plan(_)));
    }

    #[test]
    fn test_invalid_ru_id_rejected() {
        let result = Cli::try_parse_from(["hpxctl", "investigate", "RU 1"]);
        assert!(result.is_err());
    }
}
