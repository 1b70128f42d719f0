//! Feeder pushing internal betting state out to the exchange: all eligible
//! matches first, then all eligible pools.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use esb_db::FeedStore;
use esb_exchange::ExchangeApi;

use crate::{FeedOutcome, Feeder};

pub struct ExchangeFeeder<S, X> {
    pub(crate) store: S,
    pub(crate) exchange: X,
    interval: Duration,
}

impl<S, X> ExchangeFeeder<S, X>
where
    S: FeedStore + Send + Sync,
    X: ExchangeApi,
{
    pub fn new(store: S, exchange: X, interval: Duration) -> Self {
        Self {
            store,
            exchange,
            interval,
        }
    }
}

#[async_trait]
impl<S, X> Feeder for ExchangeFeeder<S, X>
where
    S: FeedStore + Send + Sync,
    X: ExchangeApi,
{
    fn name(&self) -> &'static str {
        "betting_to_exchange"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    /// Gated by the operator-controlled feed flag; a read failure counts
    /// as inactive so a flapping database cannot start a partial pass.
    async fn is_active(&self) -> bool {
        match self.store.feed_active().await {
            Ok(active) => active,
            Err(err) => {
                warn!("could not read feed flag: {err:#}");
                false
            }
        }
    }

    async fn run_pass(&self) -> Vec<FeedOutcome> {
        let mut outcomes = Vec::new();
        self.feed_matches(&mut outcomes).await;
        self.feed_pools(&mut outcomes).await;
        outcomes
    }
}
