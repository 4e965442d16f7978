//! Typed ID definitions for radio-network entities.

use crate::define_id;

// =============================================================================
// Radio access
// =============================================================================

define_id!(RuId, "RU");
define_id!(UeId, "UE");
