//! Data-access boundary consumed by the synchronizers.
//!
//! The trait is scoped to exactly the query shapes the feed needs; CRUD for
//! the admin surface lives elsewhere and is not part of this contract.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use esb_models::{
    ColossusMatch, Event, Game, Leg, Match, MatchFormat, OverUnderDefault, Pool, PoolDefault,
    PoolType,
};

/// One (event, stage) grouping of scheduled matches; the unit the pool
/// generator works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStage {
    pub event_id: Uuid,
    pub event_stage: String,
}

#[async_trait]
pub trait FeedStore: Send + Sync {
    // -- shared feed-active flag ------------------------------------------

    async fn feed_active(&self) -> Result<bool>;
    async fn set_feed_active(&self, active: bool) -> Result<()>;

    // -- match synchronization --------------------------------------------

    /// Matches with at least one leg and a known internal status,
    /// competitors and market maps loaded.
    async fn matches_with_legs(&self) -> Result<Vec<Match>>;

    async fn event(&self, event_id: Uuid) -> Result<Event>;

    /// Cascade cleanup when a match can never be sent to the exchange.
    /// Returns the number of deleted legs.
    async fn delete_legs_for_match(&self, match_id: Uuid) -> Result<u64>;

    /// Distinct pool types of the pools whose legs reference this match.
    async fn pool_types_for_match(&self, match_id: Uuid) -> Result<Vec<PoolType>>;

    async fn find_colossus_match(
        &self,
        match_id: Uuid,
        pool_type: PoolType,
    ) -> Result<Option<ColossusMatch>>;

    async fn insert_colossus_match(&self, cm: &ColossusMatch) -> Result<()>;

    async fn update_colossus_match(&self, cm: &ColossusMatch) -> Result<()>;

    /// Ids of pools of the given type that carry a leg on this match; used
    /// to tag probability markets.
    async fn pools_linked_to_match(&self, match_id: Uuid, pool_type: PoolType)
        -> Result<Vec<Uuid>>;

    // -- pool synchronization ---------------------------------------------

    /// Pools in a status the exchange feed still has work to do on
    /// (sync_error, approved, created, visible, trading_open,
    /// trading_closed, official), consolations loaded.
    async fn pools_for_sync(&self) -> Result<Vec<Pool>>;

    /// Legs of one pool paired with their matches, ordered by match start
    /// time ascending.
    async fn legs_with_matches(&self, pool_id: Uuid) -> Result<Vec<(Leg, Match)>>;

    async fn colossus_matches_for(
        &self,
        match_ids: &[Uuid],
        pool_type: PoolType,
    ) -> Result<Vec<ColossusMatch>>;

    async fn update_pool(&self, pool: &Pool) -> Result<()>;

    // -- pool generation --------------------------------------------------

    /// Distinct (event, stage) pairs that have scheduled or postponed
    /// matches.
    async fn scheduled_event_stages(&self) -> Result<Vec<EventStage>>;

    /// Scheduled/postponed matches of one stage, ordered by start time.
    async fn scheduled_matches_for_stage(
        &self,
        event_id: Uuid,
        event_stage: &str,
    ) -> Result<Vec<Match>>;

    async fn pool_default(
        &self,
        leg_count: i32,
        game: Game,
        pool_type: PoolType,
    ) -> Result<Option<PoolDefault>>;

    /// Whether a pool of this type already exists for the event (stage-
    /// scoped for H2H, event-wide for over/under).
    async fn has_pool_for_event(
        &self,
        event_id: Uuid,
        pool_type: PoolType,
        event_stage: Option<&str>,
    ) -> Result<bool>;

    async fn insert_pool(&self, pool: &Pool) -> Result<()>;

    async fn insert_leg(&self, leg: &Leg) -> Result<()>;

    async fn over_under_default(
        &self,
        game: Game,
        format: MatchFormat,
    ) -> Result<Option<OverUnderDefault>>;

    /// How many over/under defaults exist for (game, any of formats);
    /// coverage validation compares this against the distinct format count.
    async fn over_under_defaults_count(&self, game: Game, formats: &[MatchFormat]) -> Result<i64>;
}
