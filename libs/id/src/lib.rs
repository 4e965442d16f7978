//! # hpx-id
//!
//! Typed identifiers for the entities the handover planner reasons about.
//!
//! ## Design Principles
//!
//! - IDs are opaque: the planner never interprets `RU_10` beyond equality
//!   and ordering
//! - IDs are typed so an RU id can never be passed where a UE id is expected
//! - Parsing is strict about the characters that the telemetry list format
//!   uses as separators
//!
//! ## ID Format
//!
//! Any non-empty string without whitespace, `,` or `:`.
//!
//! Examples:
//! - `RU_52`
//! - `UE_7`
//!
//! `,` separates list entries and pairs in the handover payload
//! (`"RU_10,RU_52"`), `:` separates decisions in the simulator's handover
//! records, so neither may appear inside an id.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Maximum accepted id length in bytes.
pub const MAX_ID_LEN: usize = 128;
