//! Autogeneration of betting pools from the internal esports schedule.
//!
//! Scheduled matches are grouped by (event, stage); each group that passes
//! the exchange preconditions gets one head-to-head pool and, when
//! over/under defaults cover every match format present, one over/under
//! pool. New pools land in NeedsApproval for an operator to review.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use esb_db::{EventStage, FeedStore};
use esb_models::{Event, Leg, Match, Pool, PoolDefault, PoolSyncStatus, PoolType};

use crate::{validate, FeedOutcome, Feeder};

pub struct PoolGenerationFeeder<S> {
    store: S,
    interval: Duration,
}

impl<S> PoolGenerationFeeder<S>
where
    S: FeedStore + Send + Sync,
{
    pub fn new(store: S, interval: Duration) -> Self {
        Self { store, interval }
    }

    async fn create_pools_for_stage(&self, stage: &EventStage) -> Result<()> {
        let matches = self
            .store
            .scheduled_matches_for_stage(stage.event_id, &stage.event_stage)
            .await
            .with_context(|| format!("error getting matches for stage {}", stage.event_stage))?;

        if let Err(err) = validate::leg_count(matches.len())
            .and_then(|()| validate::starts_within_window(&matches))
        {
            debug!(
                event_stage = %stage.event_stage,
                "stage not eligible for pool generation: {err:#}"
            );
            return Ok(());
        }

        let event = self
            .store
            .event(stage.event_id)
            .await
            .with_context(|| format!("failed getting event for stage {}", stage.event_stage))?;

        self.create_h2h_pool(stage, &matches, &event).await?;
        self.create_over_under_pool(stage, &matches, &event).await
    }

    async fn create_h2h_pool(
        &self,
        stage: &EventStage,
        matches: &[Match],
        event: &Event,
    ) -> Result<()> {
        let default = self
            .pool_default(matches.len(), event, PoolType::H2h)
            .await?;

        if self
            .store
            .has_pool_for_event(event.id, PoolType::H2h, Some(&stage.event_stage))
            .await?
        {
            return Ok(());
        }

        let mut pool = build_pool(&default, stage);
        self.store
            .insert_pool(&pool)
            .await
            .with_context(|| format!("error inserting pool {}", pool.name))?;

        for m in matches {
            let leg = Leg {
                id: Uuid::new_v4(),
                pool_id: pool.id,
                match_id: m.id,
                threshold: None,
                last_sync_time: Some(Utc::now()),
            };
            if let Err(err) = self.store.insert_leg(&leg).await {
                error!(match_id = %m.id, pool_id = %pool.id, "error creating leg: {err:#}");
            }
        }

        pool.sync_status = PoolSyncStatus::NeedsApproval;
        self.store.update_pool(&pool).await
    }

    async fn create_over_under_pool(
        &self,
        stage: &EventStage,
        matches: &[Match],
        event: &Event,
    ) -> Result<()> {
        let default = self
            .pool_default(matches.len(), event, PoolType::OverUnder)
            .await?;

        // Over/under pools are deduplicated per event, not per stage.
        if self
            .store
            .has_pool_for_event(event.id, PoolType::OverUnder, None)
            .await?
        {
            return Ok(());
        }

        if let Err(err) = validate::over_under_coverage(&self.store, event.game, matches).await {
            info!(event_stage = %stage.event_stage, "aborting o/u pool creation: {err:#}");
            return Ok(());
        }

        let mut pool = build_pool(&default, stage);
        self.store
            .insert_pool(&pool)
            .await
            .with_context(|| format!("error inserting pool {}", pool.name))?;

        for m in matches {
            if let Err(err) = self.create_over_under_leg(m, &pool, event).await {
                error!(match_id = %m.id, pool_id = %pool.id, "error creating leg: {err:#}");
            }
        }

        pool.sync_status = PoolSyncStatus::NeedsApproval;
        self.store.update_pool(&pool).await
    }

    async fn create_over_under_leg(&self, m: &Match, pool: &Pool, event: &Event) -> Result<()> {
        let ou_default = self
            .store
            .over_under_default(event.game, m.format)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    "no over/under default for game {} format {}",
                    event.game.as_str(),
                    m.format.as_str()
                )
            })?;

        let leg = Leg {
            id: Uuid::new_v4(),
            pool_id: pool.id,
            match_id: m.id,
            threshold: Some(ou_default.threshold_for(&m.win_probabilities)),
            last_sync_time: Some(Utc::now()),
        };
        self.store.insert_leg(&leg).await
    }

    async fn pool_default(
        &self,
        leg_count: usize,
        event: &Event,
        pool_type: PoolType,
    ) -> Result<PoolDefault> {
        self.store
            .pool_default(leg_count as i32, event.game, pool_type)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    "failed getting pool defaults for leg count {}, game {}, pool type {}",
                    leg_count,
                    event.game.as_str(),
                    pool_type.as_str()
                )
            })
    }
}

#[async_trait]
impl<S> Feeder for PoolGenerationFeeder<S>
where
    S: FeedStore + Send + Sync,
{
    fn name(&self) -> &'static str {
        "esports_to_betting"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_pass(&self) -> Vec<FeedOutcome> {
        let mut outcomes = Vec::new();

        let stages = match self.store.scheduled_event_stages().await {
            Ok(stages) => stages,
            Err(err) => {
                outcomes.push(Err(err.context("could not load scheduled event stages")));
                return outcomes;
            }
        };

        for stage in &stages {
            if let Err(err) = self.create_pools_for_stage(stage).await {
                outcomes.push(Err(err));
            }
        }

        outcomes
    }
}

/// New pools copy their money parameters from the matching default row and
/// start in NotReady until all legs are attached.
fn build_pool(default: &PoolDefault, stage: &EventStage) -> Pool {
    Pool {
        id: Uuid::new_v4(),
        name: pool_name(default, &stage.event_stage),
        pool_type: default.pool_type,
        sync_status: PoolSyncStatus::NotReady,
        note: String::new(),
        game: default.game,
        currency: default.currency,
        unit_value: default.unit_value,
        min_unit_per_line: default.min_unit_per_line,
        max_unit_per_line: default.max_unit_per_line,
        min_unit_per_ticket: default.min_unit_per_ticket,
        max_unit_per_ticket: default.max_unit_per_ticket,
        guarantee: default.guarantee,
        carry_in: default.carry_in,
        allocation: default.allocation,
        is_active: true,
        is_autogenerated: true,
        last_sync_time: Some(Utc::now()),
        legs: Vec::new(),
        consolations: Vec::new(),
    }
}

fn pool_name(default: &PoolDefault, event_stage: &str) -> String {
    let type_label = match default.pool_type {
        PoolType::H2h => "H2H",
        PoolType::OverUnder => "OVER_UNDER",
    };
    format!(
        "{} Legs {} Guarantee {} Type {}",
        title_case(event_stage),
        default.leg_count,
        default.guarantee.normalize(),
        type_label
    )
}

fn title_case(stage: &str) -> String {
    stage
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use esb_models::{Game, PoolCurrency};

    #[test]
    fn pool_name_title_cases_the_stage() {
        let default = PoolDefault {
            id: Uuid::new_v4(),
            leg_count: 4,
            game: Game::Csgo,
            pool_type: PoolType::H2h,
            currency: PoolCurrency::Usd,
            unit_value: dec!(1),
            min_unit_per_line: dec!(0.1),
            max_unit_per_line: dec!(10),
            min_unit_per_ticket: dec!(0.1),
            max_unit_per_ticket: dec!(100),
            guarantee: dec!(500),
            carry_in: dec!(0),
            allocation: dec!(0),
            note: String::new(),
        };

        assert_eq!(
            pool_name(&default, "Ecs League_group_1_regular_season_NA"),
            "Ecs League Group 1 Regular Season NA Legs 4 Guarantee 500 Type H2H"
        );
    }
}
