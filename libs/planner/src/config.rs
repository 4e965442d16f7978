//! Planner configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the capacity ledger treats reservations made for an RU that turns
/// out not to be sleepable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationPolicy {
    /// Reservations for one RU are staged and charged to the ledger only if
    /// every UE of that RU found a destination.
    #[default]
    Transactional,

    /// Each reservation is charged as soon as it is found and is not
    /// returned when the RU fails. The failed RU's moves are still dropped
    /// from the plan, but later RUs see less capacity.
    Eager,
}

impl ReservationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactional => "transactional",
            Self::Eager => "eager",
        }
    }
}

impl fmt::Display for ReservationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown reservation policy '{0}' (expected transactional or eager)")]
pub struct PolicyParseError(pub String);

impl FromStr for ReservationPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(Self::Transactional),
            "eager" => Ok(Self::Eager),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

/// Limits and policy for one planning pass.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Upper bound for a single telemetry read.
    pub fetch_timeout: Duration,

    /// Upper bound for all telemetry reads of one run.
    pub run_deadline: Duration,

    pub policy: ReservationPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_millis(500),
            run_deadline: Duration::from_secs(5),
            policy: ReservationPolicy::Transactional,
        }
    }
}
