//! Handover prediction xApp library.
//!
//! The xApp receives `HP_INVESTIGATE` messages naming RUs that are
//! candidates for sleep, runs the planner against the telemetry store, and
//! answers with an `HP_HANDOVERS` message listing the UE moves that would
//! let those RUs power down. Empty plans are never sent.
//!
//! ## Modules
//!
//! - `api`: HTTP surface (message ingress, health, stats)
//! - `messaging`: message types and dispatch
//! - `telemetry`: accessor backends (InfluxDB, in-memory) and startup wait
//! - `transport`: outbound message senders
//!
//! This crate primarily ships the `hpx-xapp` binary; the library surface
//! exists for integration tests.

pub mod api;
pub mod config;
pub mod messaging;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod transport;

pub use messaging::{DispatchOutcome, Dispatcher, HP_HANDOVERS, HP_INVESTIGATE};
pub use transport::{HttpMessageSender, MemorySender, MessageSender};
