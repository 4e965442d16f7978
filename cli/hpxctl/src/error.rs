//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("xApp error: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },
}

impl CliError {
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn snapshot(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Snapshot {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check that the xApp is running and --url points at it.".yellow()
                );
            }
            CliError::Snapshot { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: A snapshot is a JSON object with \"rus\" and \"ues\" row arrays."
                        .yellow()
                );
            }
            CliError::Api { code, .. } => {
                eprintln!("\nCode: {}", code);
            }
        }
    }
}
