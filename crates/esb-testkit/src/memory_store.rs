//! In-memory store mirroring the Postgres queries closely enough for the
//! feed logic to be exercised without a database.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use esb_db::{EventStage, FeedStore};
use esb_models::{
    ColossusMatch, Event, Game, Leg, Match, MatchFormat, MatchInternalStatus, OverUnderDefault,
    Pool, PoolDefault, PoolSyncStatus, PoolType,
};

#[derive(Default)]
struct Inner {
    feed_active: bool,
    events: Vec<Event>,
    matches: Vec<Match>,
    pools: Vec<Pool>,
    legs: Vec<Leg>,
    colossus_matches: Vec<ColossusMatch>,
    pool_defaults: Vec<PoolDefault>,
    ou_defaults: Vec<OverUnderDefault>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    // --- seeding ---

    pub fn seed_event(&self, event: Event) {
        self.lock().events.push(event);
    }

    pub fn seed_match(&self, m: Match) {
        self.lock().matches.push(m);
    }

    pub fn seed_pool(&self, pool: Pool) {
        self.lock().pools.push(pool);
    }

    pub fn seed_leg(&self, leg: Leg) {
        self.lock().legs.push(leg);
    }

    pub fn seed_colossus_match(&self, cm: ColossusMatch) {
        self.lock().colossus_matches.push(cm);
    }

    pub fn seed_pool_default(&self, default: PoolDefault) {
        self.lock().pool_defaults.push(default);
    }

    pub fn seed_ou_default(&self, default: OverUnderDefault) {
        self.lock().ou_defaults.push(default);
    }

    pub fn activate_feed(&self) {
        self.lock().feed_active = true;
    }

    // --- readback ---

    pub fn pool(&self, id: Uuid) -> Option<Pool> {
        self.lock().pools.iter().find(|p| p.id == id).cloned()
    }

    pub fn pools(&self) -> Vec<Pool> {
        self.lock().pools.clone()
    }

    pub fn colossus_match(&self, match_id: Uuid, pool_type: PoolType) -> Option<ColossusMatch> {
        self.lock()
            .colossus_matches
            .iter()
            .find(|cm| cm.match_id == match_id && cm.pool_type == pool_type)
            .cloned()
    }

    pub fn legs_for_match(&self, match_id: Uuid) -> Vec<Leg> {
        self.lock()
            .legs
            .iter()
            .filter(|l| l.match_id == match_id)
            .cloned()
            .collect()
    }

    pub fn legs_for_pool(&self, pool_id: Uuid) -> Vec<Leg> {
        self.lock()
            .legs
            .iter()
            .filter(|l| l.pool_id == pool_id)
            .cloned()
            .collect()
    }

    pub fn set_match_status(&self, match_id: Uuid, status: MatchInternalStatus) {
        let mut inner = self.lock();
        if let Some(m) = inner.matches.iter_mut().find(|m| m.id == match_id) {
            m.internal_status = status;
        }
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn feed_active(&self) -> Result<bool> {
        Ok(self.lock().feed_active)
    }

    async fn set_feed_active(&self, active: bool) -> Result<()> {
        self.lock().feed_active = active;
        Ok(())
    }

    async fn matches_with_legs(&self) -> Result<Vec<Match>> {
        let inner = self.lock();
        Ok(inner
            .matches
            .iter()
            .filter(|m| {
                m.internal_status != MatchInternalStatus::Unknown
                    && inner.legs.iter().any(|l| l.match_id == m.id)
            })
            .cloned()
            .collect())
    }

    async fn event(&self, event_id: Uuid) -> Result<Event> {
        self.lock()
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| anyhow!("no event {event_id}"))
    }

    async fn delete_legs_for_match(&self, match_id: Uuid) -> Result<u64> {
        let mut inner = self.lock();
        let before = inner.legs.len();
        inner.legs.retain(|l| l.match_id != match_id);
        Ok((before - inner.legs.len()) as u64)
    }

    async fn pool_types_for_match(&self, match_id: Uuid) -> Result<Vec<PoolType>> {
        let inner = self.lock();
        let mut types = Vec::new();
        for leg in inner.legs.iter().filter(|l| l.match_id == match_id) {
            if let Some(pool) = inner.pools.iter().find(|p| p.id == leg.pool_id) {
                if !types.contains(&pool.pool_type) {
                    types.push(pool.pool_type);
                }
            }
        }
        Ok(types)
    }

    async fn find_colossus_match(
        &self,
        match_id: Uuid,
        pool_type: PoolType,
    ) -> Result<Option<ColossusMatch>> {
        Ok(self.colossus_match(match_id, pool_type))
    }

    async fn insert_colossus_match(&self, cm: &ColossusMatch) -> Result<()> {
        self.lock().colossus_matches.push(cm.clone());
        Ok(())
    }

    async fn update_colossus_match(&self, cm: &ColossusMatch) -> Result<()> {
        let mut inner = self.lock();
        let row = inner
            .colossus_matches
            .iter_mut()
            .find(|row| row.id == cm.id)
            .ok_or_else(|| anyhow!("no colossus match {}", cm.id))?;
        row.status = cm.status;
        Ok(())
    }

    async fn pools_linked_to_match(
        &self,
        match_id: Uuid,
        pool_type: PoolType,
    ) -> Result<Vec<Uuid>> {
        let inner = self.lock();
        let mut ids = Vec::new();
        for leg in inner.legs.iter().filter(|l| l.match_id == match_id) {
            if let Some(pool) = inner
                .pools
                .iter()
                .find(|p| p.id == leg.pool_id && p.pool_type == pool_type)
            {
                if !ids.contains(&pool.id) {
                    ids.push(pool.id);
                }
            }
        }
        Ok(ids)
    }

    async fn pools_for_sync(&self) -> Result<Vec<Pool>> {
        const ELIGIBLE: [PoolSyncStatus; 7] = [
            PoolSyncStatus::SyncError,
            PoolSyncStatus::Approved,
            PoolSyncStatus::Created,
            PoolSyncStatus::Visible,
            PoolSyncStatus::TradingOpen,
            PoolSyncStatus::TradingClosed,
            PoolSyncStatus::Official,
        ];
        Ok(self
            .lock()
            .pools
            .iter()
            .filter(|p| ELIGIBLE.contains(&p.sync_status))
            .cloned()
            .collect())
    }

    async fn legs_with_matches(&self, pool_id: Uuid) -> Result<Vec<(Leg, Match)>> {
        let inner = self.lock();
        let mut rows = Vec::new();
        for leg in inner.legs.iter().filter(|l| l.pool_id == pool_id) {
            let m = inner
                .matches
                .iter()
                .find(|m| m.id == leg.match_id)
                .ok_or_else(|| anyhow!("leg {} references unknown match", leg.id))?;
            rows.push((leg.clone(), m.clone()));
        }
        rows.sort_by_key(|(_, m)| m.start_time);
        Ok(rows)
    }

    async fn colossus_matches_for(
        &self,
        match_ids: &[Uuid],
        pool_type: PoolType,
    ) -> Result<Vec<ColossusMatch>> {
        Ok(self
            .lock()
            .colossus_matches
            .iter()
            .filter(|cm| cm.pool_type == pool_type && match_ids.contains(&cm.match_id))
            .cloned()
            .collect())
    }

    async fn update_pool(&self, pool: &Pool) -> Result<()> {
        let mut inner = self.lock();
        let row = inner
            .pools
            .iter_mut()
            .find(|p| p.id == pool.id)
            .ok_or_else(|| anyhow!("no pool {}", pool.id))?;
        row.sync_status = pool.sync_status;
        row.note = pool.note.clone();
        row.last_sync_time = pool.last_sync_time;
        Ok(())
    }

    async fn scheduled_event_stages(&self) -> Result<Vec<EventStage>> {
        let inner = self.lock();
        let mut stages: Vec<EventStage> = Vec::new();
        for m in inner.matches.iter().filter(|m| {
            matches!(
                m.internal_status,
                MatchInternalStatus::Scheduled | MatchInternalStatus::Postponed
            )
        }) {
            let seen = stages
                .iter()
                .any(|s| s.event_id == m.event_id && s.event_stage == m.event_stage);
            if !seen {
                stages.push(EventStage {
                    event_id: m.event_id,
                    event_stage: m.event_stage.clone(),
                });
            }
        }
        Ok(stages)
    }

    async fn scheduled_matches_for_stage(
        &self,
        event_id: Uuid,
        event_stage: &str,
    ) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .lock()
            .matches
            .iter()
            .filter(|m| {
                m.event_id == event_id
                    && m.event_stage == event_stage
                    && matches!(
                        m.internal_status,
                        MatchInternalStatus::Scheduled | MatchInternalStatus::Postponed
                    )
            })
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.start_time);
        Ok(matches)
    }

    async fn pool_default(
        &self,
        leg_count: i32,
        game: Game,
        pool_type: PoolType,
    ) -> Result<Option<PoolDefault>> {
        Ok(self
            .lock()
            .pool_defaults
            .iter()
            .find(|d| d.leg_count == leg_count && d.game == game && d.pool_type == pool_type)
            .cloned())
    }

    async fn has_pool_for_event(
        &self,
        event_id: Uuid,
        pool_type: PoolType,
        event_stage: Option<&str>,
    ) -> Result<bool> {
        let inner = self.lock();
        for pool in inner.pools.iter().filter(|p| p.pool_type == pool_type) {
            for leg in inner.legs.iter().filter(|l| l.pool_id == pool.id) {
                let Some(m) = inner.matches.iter().find(|m| m.id == leg.match_id) else {
                    continue;
                };
                if m.event_id != event_id {
                    continue;
                }
                if let Some(stage) = event_stage {
                    if m.event_stage != stage {
                        continue;
                    }
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn insert_pool(&self, pool: &Pool) -> Result<()> {
        self.lock().pools.push(pool.clone());
        Ok(())
    }

    async fn insert_leg(&self, leg: &Leg) -> Result<()> {
        self.lock().legs.push(leg.clone());
        Ok(())
    }

    async fn over_under_default(
        &self,
        game: Game,
        format: MatchFormat,
    ) -> Result<Option<OverUnderDefault>> {
        Ok(self
            .lock()
            .ou_defaults
            .iter()
            .find(|d| d.game == game && d.match_format == format)
            .cloned())
    }

    async fn over_under_defaults_count(
        &self,
        game: Game,
        formats: &[MatchFormat],
    ) -> Result<i64> {
        Ok(self
            .lock()
            .ou_defaults
            .iter()
            .filter(|d| d.game == game && formats.contains(&d.match_format))
            .count() as i64)
    }
}
