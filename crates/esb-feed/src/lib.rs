//! esb-feed
//!
//! State reconciliation between internal betting records and the Colossus
//! exchange, plus autogeneration of betting pools from the esports schedule.
//!
//! Architectural decisions:
//! - Reconciliation is resync-then-advance: every pass re-reads the remote
//!   status before applying a local transition, so state drift between
//!   passes heals itself.
//! - Per-item isolation: a failure on one match or pool is reported on the
//!   pass's outcome list and the pass moves on; only a failure to load the
//!   work set aborts a pass.
//! - Feeders are an explicit collection assembled at startup and handed to
//!   [`spawn_feeders`]; there is no registry.
//! - A pass is sequential. Outcomes accumulate in a `Vec` and are logged by
//!   the scheduler once the pass completes.

mod exchange_feed;
mod match_sync;
mod pool_gen;
mod pool_sync;
mod scheduler;
pub mod validate;

pub use exchange_feed::ExchangeFeeder;
pub use pool_gen::PoolGenerationFeeder;
pub use scheduler::spawn_feeders;

use std::time::Duration;

use async_trait::async_trait;

/// One per-item result of a feed pass: an informational message or the
/// error that stopped that item.
pub type FeedOutcome = anyhow::Result<String>;

/// A periodic background synchronization job.
#[async_trait]
pub trait Feeder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Sleep between passes.
    fn interval(&self) -> Duration;

    /// Checked before every pass; an inactive feeder skips the pass but
    /// keeps its loop alive.
    async fn is_active(&self) -> bool {
        true
    }

    /// Runs one full pass over all eligible work items.
    async fn run_pass(&self) -> Vec<FeedOutcome>;
}
