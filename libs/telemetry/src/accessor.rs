//! The accessor contract the planner consumes.

use std::sync::Arc;

use async_trait::async_trait;
use hpx_id::{RuId, UeId};

use crate::{RuRecord, TelemetryResult, UeRecord};

/// Read-only access to the latest reading of each entity.
///
/// Implementations must be safe for concurrent reads and must return
/// values directly from each call.
#[async_trait]
pub trait TelemetryAccessor: Send + Sync {
    /// Latest reading for a radio unit.
    async fn latest_ru(&self, id: &RuId) -> TelemetryResult<RuRecord>;

    /// Latest reading for a user equipment.
    async fn latest_ue(&self, id: &UeId) -> TelemetryResult<UeRecord>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> TelemetryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: TelemetryAccessor + ?Sized> TelemetryAccessor for Arc<T> {
    async fn latest_ru(&self, id: &RuId) -> TelemetryResult<RuRecord> {
        (**self).latest_ru(id).await
    }

    async fn latest_ue(&self, id: &UeId) -> TelemetryResult<UeRecord> {
        (**self).latest_ue(id).await
    }

    async fn health_check(&self) -> TelemetryResult<()> {
        (**self).health_check().await
    }
}
