//! Error types for telemetry reads.

use std::time::Duration;

use thiserror::Error;

/// Result type for telemetry reads.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors that can occur when reading the latest state of an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The store has no reading for this entity.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// The store could not be reached or rejected the query.
    #[error("telemetry unavailable for {id}: {reason}")]
    Unavailable { id: String, reason: String },

    /// The read did not complete within the per-fetch timeout.
    #[error("telemetry read for {id} timed out after {after:?}")]
    Timeout { id: String, after: Duration },

    /// A reading exists but is missing required fields or has bad values.
    #[error("malformed record for {id}: {reason}")]
    Malformed { id: String, reason: String },
}

impl TelemetryError {
    /// Create a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-record error.
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Short label for structured logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } | Self::Timeout { .. } => "unavailable",
            Self::Malformed { .. } => "malformed",
        }
    }

    /// Returns true if the store answered but had no reading.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
