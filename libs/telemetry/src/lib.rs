//! # hpx-telemetry
//!
//! The planner's view of the telemetry store.
//!
//! ## Design Principles
//!
//! - Every read returns the latest known state of one entity by value;
//!   there is no shared "last read" cursor, so concurrent runs never
//!   observe each other's reads
//! - The store's string-encoded lists (`"UE_1,UE_2,"`) are decoded here,
//!   at the boundary; everything downstream sees ordered id sequences
//! - A record that is present but unusable is reported as
//!   [`TelemetryError::Malformed`], distinct from a record that is absent
//!
//! ## Row Schema
//!
//! RU rows carry `free_PRB` and `connections`; UE rows carry `demand` and
//! either `near_RU` or the simulator's `ru_close_<i>` columns. See [`row`].

mod accessor;
mod dump;
mod error;
pub mod list;
mod memory;
mod record;
pub mod row;

pub use accessor::TelemetryAccessor;
pub use dump::TelemetryDump;
pub use error::{TelemetryError, TelemetryResult};
pub use memory::InMemoryTelemetry;
pub use record::{RuRecord, UeRecord};
