//! In-memory telemetry store.
//!
//! Used by tests, by the offline CLI, and by the service when no database is
//! configured. Built once, then shared read-only.

use std::collections::HashMap;

use async_trait::async_trait;
use hpx_id::{RuId, UeId};

use crate::{RuRecord, TelemetryAccessor, TelemetryError, TelemetryResult, UeRecord};

#[derive(Debug, Clone)]
enum Stored<T> {
    Valid(T),
    Malformed(String),
}

impl<T: Clone> Stored<T> {
    fn read(&self, id: &str) -> TelemetryResult<T> {
        match self {
            Stored::Valid(record) => Ok(record.clone()),
            Stored::Malformed(reason) => Err(TelemetryError::malformed(id, reason.clone())),
        }
    }
}

/// Latest readings held in memory. Inserting an id again replaces its reading.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTelemetry {
    rus: HashMap<RuId, Stored<RuRecord>>,
    ues: HashMap<UeId, Stored<UeRecord>>,
}

impl InMemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ru(&mut self, record: RuRecord) -> &mut Self {
        self.rus.insert(record.id.clone(), Stored::Valid(record));
        self
    }

    pub fn insert_ue(&mut self, record: UeRecord) -> &mut Self {
        self.ues.insert(record.id.clone(), Stored::Valid(record));
        self
    }

    /// Store a reading that exists but cannot be decoded.
    pub fn insert_malformed_ru(&mut self, id: RuId, reason: impl Into<String>) -> &mut Self {
        self.rus.insert(id, Stored::Malformed(reason.into()));
        self
    }

    /// Store a reading that exists but cannot be decoded.
    pub fn insert_malformed_ue(&mut self, id: UeId, reason: impl Into<String>) -> &mut Self {
        self.ues.insert(id, Stored::Malformed(reason.into()));
        self
    }

    pub fn ru_count(&self) -> usize {
        self.rus.len()
    }

    pub fn ue_count(&self) -> usize {
        self.ues.len()
    }

    /// All RU ids held, sorted.
    pub fn ru_ids(&self) -> Vec<RuId> {
        let mut ids: Vec<RuId> = self.rus.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl TelemetryAccessor for InMemoryTelemetry {
    async fn latest_ru(&self, id: &RuId) -> TelemetryResult<RuRecord> {
        self.rus
            .get(id)
            .ok_or_else(|| TelemetryError::not_found(RuId::KIND, id.as_str()))?
            .read(id.as_str())
    }

    async fn latest_ue(&self, id: &UeId) -> TelemetryResult<UeRecord> {
        self.ues
            .get(id)
            .ok_or_else(|| TelemetryError::not_found(UeId::KIND, id.as_str()))?
            .read(id.as_str())
    }
}
