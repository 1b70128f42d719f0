//! esb-testkit
//!
//! Deterministic fakes for scenario tests:
//! - [`MemoryStore`]: an in-memory [`esb_db::FeedStore`] with seeding and
//!   readback helpers. No database required.
//! - [`ScriptedExchange`]: an [`esb_exchange::ExchangeApi`] that records
//!   every call, tracks remote state the way the real exchange would, and
//!   can be scripted to fail specific operations.
//!
//! No randomness beyond fresh UUIDs, no network I/O.

mod fixtures;
mod memory_store;
mod scripted_exchange;

pub use fixtures::*;
pub use memory_store::MemoryStore;
pub use scripted_exchange::{ExchangeCall, ScriptedExchange};
