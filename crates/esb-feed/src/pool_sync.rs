//! Pool-side reconciliation.
//!
//! Pools advance through a forward-only lifecycle mirrored against the
//! exchange. The go-live stages (create, make visible, open trading) chain
//! within a single pass; the row is persisted once at the end of the item,
//! so a failure mid-chain can leave the local status behind the exchange's
//! until the next resync heals it. That window is inherent to the design
//! and accepted.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tracing::warn;

use esb_db::FeedStore;
use esb_exchange::ExchangeApi;
use esb_models::{ColossusMatchStatus, Pool, PoolSyncStatus};

use crate::exchange_feed::ExchangeFeeder;
use crate::{validate, FeedOutcome};

impl<S, X> ExchangeFeeder<S, X>
where
    S: FeedStore + Send + Sync,
    X: ExchangeApi,
{
    pub(crate) async fn feed_pools(&self, outcomes: &mut Vec<FeedOutcome>) {
        let pools = match self.store.pools_for_sync().await {
            Ok(pools) => pools,
            Err(err) => {
                outcomes.push(Err(err.context("could not load pools for synchronization")));
                return;
            }
        };

        for mut pool in pools {
            if let Err(err) = self.feed_pool(&mut pool, outcomes).await {
                outcomes.push(Err(err));
            }
        }
    }

    async fn feed_pool(&self, pool: &mut Pool, outcomes: &mut Vec<FeedOutcome>) -> Result<()> {
        let legs = self
            .store
            .legs_with_matches(pool.id)
            .await
            .with_context(|| format!("failed getting legs for pool {}", pool.id))?;

        let match_ids: Vec<_> = legs.iter().map(|(leg, _)| leg.match_id).collect();
        let linked = self
            .store
            .colossus_matches_for(&match_ids, pool.pool_type)
            .await
            .with_context(|| format!("failed getting exchange matches for pool {}", pool.id))?;

        // Pair each leg with its linkage row; a leg whose match was never
        // sent gets a placeholder at Unknown.
        let statuses: Vec<ColossusMatchStatus> = legs
            .iter()
            .map(|(leg, _)| {
                linked
                    .iter()
                    .find(|cm| cm.match_id == leg.match_id)
                    .map(|cm| cm.status)
                    .unwrap_or(ColossusMatchStatus::Unknown)
            })
            .collect();

        let no_matches_started = statuses
            .iter()
            .all(|s| *s == ColossusMatchStatus::NotStarted);
        let all_matches_ended = statuses.iter().all(|s| s.is_terminal());

        pool.legs = legs.into_iter().map(|(leg, _)| leg).collect();

        if !self.check_pool_sendable(no_matches_started, pool).await? {
            return Ok(());
        }

        pool.sync_status = match self.resync_pool(pool).await {
            Ok(status) => status,
            Err(err) => {
                pool.sync_status = PoolSyncStatus::SyncError;
                self.store
                    .update_pool(pool)
                    .await
                    .context("could not update pool record")?;
                outcomes.push(Err(err));
                return Ok(());
            }
        };

        if let Err(err) = self.advance_pool(pool, no_matches_started, all_matches_ended).await {
            warn!(pool_id = %pool.id, "issue advancing pool: {err:#}");
            outcomes.push(Err(
                err.context(format!("could not advance pool {}", pool.id))
            ));
        }

        self.store
            .update_pool(pool)
            .await
            .context("could not update pool record")
    }

    /// Eligibility gate. Returns false when the pool was reclassified and
    /// must not be advanced this pass.
    async fn check_pool_sendable(
        &self,
        no_matches_started: bool,
        pool: &mut Pool,
    ) -> Result<bool> {
        if pool.sync_status == PoolSyncStatus::Approved && !no_matches_started {
            pool.sync_status = PoolSyncStatus::Abandoned;
            pool.note = "At least one leg match has started; this pool cannot be used".into();
            self.store
                .update_pool(pool)
                .await
                .context("could not update pool status")?;
            return Ok(false);
        }

        if let Err(err) = validate::leg_count(pool.legs.len()) {
            pool.sync_status = PoolSyncStatus::NeedsApproval;
            pool.note = format!("{} {}", pool.note, err);
            self.store
                .update_pool(pool)
                .await
                .context("could not update pool status")?;
            bail!(
                "approved pool {} has an invalid number of legs, sent back for review",
                pool.id
            );
        }

        Ok(true)
    }

    /// Fetches the remote pool status. 404 means not yet created remotely
    /// and maps to Approved; a settlement timestamp on the response always
    /// wins over the reported status.
    async fn resync_pool(&self, pool: &Pool) -> Result<PoolSyncStatus> {
        let pool_id = pool.id.to_string();
        match self.exchange.pool_status(&pool_id).await {
            Ok(resp) => {
                if resp.settled_at.is_some() {
                    return Ok(PoolSyncStatus::Settled);
                }
                let status = resp.status.ok_or_else(|| {
                    anyhow!("could not resync pool {pool_id}, response carried no status")
                })?;
                Ok(esb_convert::from_exchange_pool_status(status))
            }
            Err(err) if err.is_not_found() => Ok(PoolSyncStatus::Approved),
            Err(err) => Err(anyhow!(err)
                .context(format!("exchange returned an error resyncing pool {pool_id}"))),
        }
    }

    async fn advance_pool(
        &self,
        pool: &mut Pool,
        no_matches_started: bool,
        all_matches_ended: bool,
    ) -> Result<()> {
        match pool.sync_status {
            // Go-live chain: each completed stage feeds the next so a brand
            // new pool can reach open trading within a single pass.
            PoolSyncStatus::Approved | PoolSyncStatus::Created | PoolSyncStatus::Visible => loop {
                let next = match pool.sync_status {
                    PoolSyncStatus::Approved => self.advance_approved(pool).await?,
                    PoolSyncStatus::Created => self.advance_created(pool).await?,
                    PoolSyncStatus::Visible => self.advance_visible(pool).await?,
                    _ => break,
                };
                pool.sync_status = next;
            },
            PoolSyncStatus::TradingOpen => {
                // Closing trading is local bookkeeping only; the exchange
                // itself stops new purchases once a leg progresses, and a
                // remote trading-disable would also block settlement.
                if !no_matches_started {
                    pool.sync_status = PoolSyncStatus::TradingClosed;
                }
            }
            PoolSyncStatus::TradingClosed => {
                if all_matches_ended {
                    pool.sync_status = self.settle(pool).await?;
                }
            }
            PoolSyncStatus::Official => {
                pool.sync_status = self.settle(pool).await?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn advance_approved(&self, pool: &Pool) -> Result<PoolSyncStatus> {
        let payload = esb_convert::to_pool_create(pool)?;
        self.exchange.create_pool(&payload).await?;
        Ok(PoolSyncStatus::Created)
    }

    async fn advance_created(&self, pool: &Pool) -> Result<PoolSyncStatus> {
        self.exchange
            .toggle_pool_visibility(&pool.id.to_string(), true)
            .await?;
        Ok(PoolSyncStatus::Visible)
    }

    async fn advance_visible(&self, pool: &Pool) -> Result<PoolSyncStatus> {
        self.exchange
            .toggle_pool_trading(&pool.id.to_string(), true)
            .await?;
        Ok(PoolSyncStatus::TradingOpen)
    }

    async fn settle(&self, pool: &mut Pool) -> Result<PoolSyncStatus> {
        match self.exchange.settle_pool(&pool.id.to_string()).await {
            Ok(_) => {
                pool.last_sync_time = Some(Utc::now());
                Ok(PoolSyncStatus::Settled)
            }
            // Settlement is retried from Official on the next pass.
            Err(err) => {
                pool.sync_status = PoolSyncStatus::Official;
                Err(err.into())
            }
        }
    }
}
