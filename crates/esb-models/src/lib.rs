//! esb-models
//!
//! Internal entities of the betting feed and their status vocabularies.
//!
//! Architectural decisions:
//! - Plain serde structs, no DB or HTTP types; the store layer maps rows
//!   into these and the exchange layer owns the wire shapes.
//! - All statuses are closed enums with stable snake_case string forms
//!   (`as_str`/`parse`) used both in Postgres columns and in logs.
//! - Money, probabilities and thresholds are `rust_decimal::Decimal`.

pub mod odds;

mod entities;
mod status;

pub use entities::*;
pub use status::*;
