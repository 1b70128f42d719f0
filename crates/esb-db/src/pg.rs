use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use esb_models::{
    ColossusMatch, ColossusMatchStatus, Competitor, ConsolationPrize, Event, Game, Leg, Match,
    MatchFormat, MatchInternalStatus, OverUnderDefault, Pool, PoolCurrency, PoolDefault,
    PoolSyncStatus, PoolType,
};

use crate::store::{EventStage, FeedStore};

/// Production [`FeedStore`] over a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn competitors_for_match(&self, match_id: Uuid) -> Result<Vec<Competitor>> {
        let rows = sqlx::query(
            r#"
            select c.id, c.external_id, c.name
            from competitors c
            join competitor_matches cm on cm.competitor_id = c.id
            where cm.match_id = $1
            order by c.name
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .context("competitors_for_match failed")?;

        rows.iter()
            .map(|row| {
                Ok(Competitor {
                    id: row.try_get("id")?,
                    external_id: row.try_get("external_id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    async fn consolations_for_pool(&self, pool_id: Uuid) -> Result<Vec<ConsolationPrize>> {
        let rows = sqlx::query(
            "select id, pool_id, guarantee, carry_in, allocation \
             from consolation_prizes where pool_id = $1 order by guarantee desc",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .context("consolations_for_pool failed")?;

        rows.iter()
            .map(|row| {
                Ok(ConsolationPrize {
                    id: row.try_get("id")?,
                    pool_id: row.try_get("pool_id")?,
                    guarantee: row.try_get("guarantee")?,
                    carry_in: row.try_get("carry_in")?,
                    allocation: row.try_get("allocation")?,
                })
            })
            .collect()
    }
}

fn decode_score_map(value: serde_json::Value) -> Result<HashMap<String, i32>> {
    serde_json::from_value(value).context("bad score map json")
}

fn decode_probability_map(value: serde_json::Value) -> Result<HashMap<String, Decimal>> {
    serde_json::from_value(value).context("bad probability map json")
}

fn map_match(row: &PgRow) -> Result<Match> {
    Ok(Match {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        event_stage: row.try_get("event_stage")?,
        format: MatchFormat::parse(row.try_get::<&str, _>("format")?)?,
        start_time: row.try_get::<DateTime<Utc>, _>("start_time")?,
        internal_status: MatchInternalStatus::parse(row.try_get::<&str, _>("internal_status")?)?,
        competitors: Vec::new(),
        win_probabilities: decode_probability_map(row.try_get("win_probabilities")?)?,
        scores: decode_score_map(row.try_get("scores")?)?,
        ou_scores: decode_score_map(row.try_get("ou_scores")?)?,
    })
}

fn map_pool(row: &PgRow) -> Result<Pool> {
    Ok(Pool {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        pool_type: PoolType::parse(row.try_get::<&str, _>("pool_type")?)?,
        sync_status: PoolSyncStatus::parse(row.try_get::<&str, _>("sync_status")?)?,
        note: row.try_get("note")?,
        game: Game::parse(row.try_get::<&str, _>("game")?)?,
        currency: PoolCurrency::parse(row.try_get::<&str, _>("currency")?)?,
        unit_value: row.try_get("unit_value")?,
        min_unit_per_line: row.try_get("min_unit_per_line")?,
        max_unit_per_line: row.try_get("max_unit_per_line")?,
        min_unit_per_ticket: row.try_get("min_unit_per_ticket")?,
        max_unit_per_ticket: row.try_get("max_unit_per_ticket")?,
        guarantee: row.try_get("guarantee")?,
        carry_in: row.try_get("carry_in")?,
        allocation: row.try_get("allocation")?,
        is_active: row.try_get("is_active")?,
        is_autogenerated: row.try_get("is_autogenerated")?,
        last_sync_time: row.try_get("last_sync_time")?,
        legs: Vec::new(),
        consolations: Vec::new(),
    })
}

fn map_leg(row: &PgRow) -> Result<Leg> {
    Ok(Leg {
        id: row.try_get("id")?,
        pool_id: row.try_get("pool_id")?,
        match_id: row.try_get("match_id")?,
        threshold: row.try_get("threshold")?,
        last_sync_time: row.try_get("last_sync_time")?,
    })
}

fn map_colossus_match(row: &PgRow) -> Result<ColossusMatch> {
    Ok(ColossusMatch {
        id: row.try_get("id")?,
        match_id: row.try_get("match_id")?,
        pool_type: PoolType::parse(row.try_get::<&str, _>("pool_type")?)?,
        status: ColossusMatchStatus::parse(row.try_get::<&str, _>("status")?)?,
    })
}

const POOL_COLUMNS: &str = "id, name, pool_type, sync_status, note, game, currency, \
     unit_value, min_unit_per_line, max_unit_per_line, min_unit_per_ticket, \
     max_unit_per_ticket, guarantee, carry_in, allocation, is_active, \
     is_autogenerated, last_sync_time";

const MATCH_COLUMNS: &str = "id, event_id, event_stage, format, start_time, internal_status, \
     win_probabilities, scores, ou_scores";

#[async_trait]
impl FeedStore for PgStore {
    async fn feed_active(&self) -> Result<bool> {
        let row = sqlx::query("select is_feed_active from system_state limit 1")
            .fetch_optional(&self.pool)
            .await
            .context("feed_active query failed")?;
        Ok(match row {
            Some(row) => row.try_get("is_feed_active")?,
            None => false,
        })
    }

    async fn set_feed_active(&self, active: bool) -> Result<()> {
        sqlx::query("update system_state set is_feed_active = $1")
            .bind(active)
            .execute(&self.pool)
            .await
            .context("set_feed_active failed")?;
        Ok(())
    }

    async fn matches_with_legs(&self) -> Result<Vec<Match>> {
        let rows = sqlx::query(&format!(
            r#"
            select {MATCH_COLUMNS}
            from matches
            where internal_status <> 'unknown'
              and exists (select 1 from legs where legs.match_id = matches.id)
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .context("matches_with_legs failed")?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut m = map_match(row)?;
            m.competitors = self.competitors_for_match(m.id).await?;
            matches.push(m);
        }
        Ok(matches)
    }

    async fn event(&self, event_id: Uuid) -> Result<Event> {
        let row = sqlx::query("select id, name, game from events where id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .context("event query failed")?
            .ok_or_else(|| anyhow!("no event {event_id}"))?;

        Ok(Event {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            game: Game::parse(row.try_get::<&str, _>("game")?)?,
        })
    }

    async fn delete_legs_for_match(&self, match_id: Uuid) -> Result<u64> {
        let result = sqlx::query("delete from legs where match_id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await
            .context("delete_legs_for_match failed")?;
        Ok(result.rows_affected())
    }

    async fn pool_types_for_match(&self, match_id: Uuid) -> Result<Vec<PoolType>> {
        let rows = sqlx::query(
            r#"
            select distinct p.pool_type
            from pools p
            join legs l on l.pool_id = p.id
            where l.match_id = $1
            order by p.pool_type
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .context("pool_types_for_match failed")?;

        rows.iter()
            .map(|row| PoolType::parse(row.try_get::<&str, _>("pool_type")?))
            .collect()
    }

    async fn find_colossus_match(
        &self,
        match_id: Uuid,
        pool_type: PoolType,
    ) -> Result<Option<ColossusMatch>> {
        let row = sqlx::query(
            "select id, match_id, pool_type, status from colossus_matches \
             where match_id = $1 and pool_type = $2",
        )
        .bind(match_id)
        .bind(pool_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("find_colossus_match failed")?;

        row.as_ref().map(map_colossus_match).transpose()
    }

    async fn insert_colossus_match(&self, cm: &ColossusMatch) -> Result<()> {
        sqlx::query(
            "insert into colossus_matches (id, match_id, pool_type, status) \
             values ($1, $2, $3, $4)",
        )
        .bind(cm.id)
        .bind(cm.match_id)
        .bind(cm.pool_type.as_str())
        .bind(cm.status.as_str())
        .execute(&self.pool)
        .await
        .context("insert_colossus_match failed")?;
        Ok(())
    }

    async fn update_colossus_match(&self, cm: &ColossusMatch) -> Result<()> {
        sqlx::query("update colossus_matches set status = $2 where id = $1")
            .bind(cm.id)
            .bind(cm.status.as_str())
            .execute(&self.pool)
            .await
            .context("update_colossus_match failed")?;
        Ok(())
    }

    async fn pools_linked_to_match(
        &self,
        match_id: Uuid,
        pool_type: PoolType,
    ) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
            select distinct p.id
            from pools p
            join legs l on l.pool_id = p.id
            where l.match_id = $1 and p.pool_type = $2
            "#,
        )
        .bind(match_id)
        .bind(pool_type.as_str())
        .fetch_all(&self.pool)
        .await
        .context("pools_linked_to_match failed")?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(Into::into))
            .collect()
    }

    async fn pools_for_sync(&self) -> Result<Vec<Pool>> {
        let statuses: Vec<&str> = [
            PoolSyncStatus::SyncError,
            PoolSyncStatus::Approved,
            PoolSyncStatus::Created,
            PoolSyncStatus::Visible,
            PoolSyncStatus::TradingOpen,
            PoolSyncStatus::TradingClosed,
            PoolSyncStatus::Official,
        ]
        .iter()
        .map(|s| s.as_str())
        .collect();

        let rows = sqlx::query(&format!(
            "select {POOL_COLUMNS} from pools where sync_status = any($1)"
        ))
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await
        .context("pools_for_sync failed")?;

        let mut pools = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut pool = map_pool(row)?;
            pool.consolations = self.consolations_for_pool(pool.id).await?;
            pools.push(pool);
        }
        Ok(pools)
    }

    async fn legs_with_matches(&self, pool_id: Uuid) -> Result<Vec<(Leg, Match)>> {
        let rows = sqlx::query(
            r#"
            select l.id, l.pool_id, l.match_id, l.threshold, l.last_sync_time,
                   m.id as m_id, m.event_id, m.event_stage, m.format, m.start_time,
                   m.internal_status, m.win_probabilities, m.scores, m.ou_scores
            from legs l
            join matches m on m.id = l.match_id
            where l.pool_id = $1
            order by m.start_time asc
            "#,
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .context("legs_with_matches failed")?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let leg = map_leg(row)?;
            let m = Match {
                id: row.try_get("m_id")?,
                event_id: row.try_get("event_id")?,
                event_stage: row.try_get("event_stage")?,
                format: MatchFormat::parse(row.try_get::<&str, _>("format")?)?,
                start_time: row.try_get("start_time")?,
                internal_status: MatchInternalStatus::parse(
                    row.try_get::<&str, _>("internal_status")?,
                )?,
                competitors: Vec::new(),
                win_probabilities: decode_probability_map(row.try_get("win_probabilities")?)?,
                scores: decode_score_map(row.try_get("scores")?)?,
                ou_scores: decode_score_map(row.try_get("ou_scores")?)?,
            };
            out.push((leg, m));
        }
        Ok(out)
    }

    async fn colossus_matches_for(
        &self,
        match_ids: &[Uuid],
        pool_type: PoolType,
    ) -> Result<Vec<ColossusMatch>> {
        let rows = sqlx::query(
            "select id, match_id, pool_type, status from colossus_matches \
             where match_id = any($1) and pool_type = $2",
        )
        .bind(match_ids)
        .bind(pool_type.as_str())
        .fetch_all(&self.pool)
        .await
        .context("colossus_matches_for failed")?;

        rows.iter().map(map_colossus_match).collect()
    }

    async fn update_pool(&self, pool: &Pool) -> Result<()> {
        sqlx::query(
            r#"
            update pools set
               sync_status = $2,
               note = $3,
               last_sync_time = $4
            where id = $1
            "#,
        )
        .bind(pool.id)
        .bind(pool.sync_status.as_str())
        .bind(&pool.note)
        .bind(pool.last_sync_time)
        .execute(&self.pool)
        .await
        .context("update_pool failed")?;
        Ok(())
    }

    async fn scheduled_event_stages(&self) -> Result<Vec<EventStage>> {
        let rows = sqlx::query(
            "select distinct event_id, event_stage from matches \
             where internal_status in ('scheduled', 'postponed')",
        )
        .fetch_all(&self.pool)
        .await
        .context("scheduled_event_stages failed")?;

        rows.iter()
            .map(|row| {
                Ok(EventStage {
                    event_id: row.try_get("event_id")?,
                    event_stage: row.try_get("event_stage")?,
                })
            })
            .collect()
    }

    async fn scheduled_matches_for_stage(
        &self,
        event_id: Uuid,
        event_stage: &str,
    ) -> Result<Vec<Match>> {
        let rows = sqlx::query(&format!(
            r#"
            select {MATCH_COLUMNS}
            from matches
            where event_id = $1 and event_stage = $2
              and internal_status in ('scheduled', 'postponed')
            order by start_time asc
            "#
        ))
        .bind(event_id)
        .bind(event_stage)
        .fetch_all(&self.pool)
        .await
        .context("scheduled_matches_for_stage failed")?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut m = map_match(row)?;
            m.competitors = self.competitors_for_match(m.id).await?;
            matches.push(m);
        }
        Ok(matches)
    }

    async fn pool_default(
        &self,
        leg_count: i32,
        game: Game,
        pool_type: PoolType,
    ) -> Result<Option<PoolDefault>> {
        let row = sqlx::query(
            r#"
            select id, leg_count, game, pool_type, currency, unit_value,
                   min_unit_per_line, max_unit_per_line, min_unit_per_ticket,
                   max_unit_per_ticket, guarantee, carry_in, allocation, note
            from pool_defaults
            where leg_count = $1 and game = $2 and pool_type = $3
            limit 1
            "#,
        )
        .bind(leg_count)
        .bind(game.as_str())
        .bind(pool_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("pool_default query failed")?;

        let Some(row) = row else { return Ok(None) };
        Ok(Some(PoolDefault {
            id: row.try_get("id")?,
            leg_count: row.try_get("leg_count")?,
            game: Game::parse(row.try_get::<&str, _>("game")?)?,
            pool_type: PoolType::parse(row.try_get::<&str, _>("pool_type")?)?,
            currency: PoolCurrency::parse(row.try_get::<&str, _>("currency")?)?,
            unit_value: row.try_get("unit_value")?,
            min_unit_per_line: row.try_get("min_unit_per_line")?,
            max_unit_per_line: row.try_get("max_unit_per_line")?,
            min_unit_per_ticket: row.try_get("min_unit_per_ticket")?,
            max_unit_per_ticket: row.try_get("max_unit_per_ticket")?,
            guarantee: row.try_get("guarantee")?,
            carry_in: row.try_get("carry_in")?,
            allocation: row.try_get("allocation")?,
            note: row.try_get("note")?,
        }))
    }

    async fn has_pool_for_event(
        &self,
        event_id: Uuid,
        pool_type: PoolType,
        event_stage: Option<&str>,
    ) -> Result<bool> {
        let count: i64 = match event_stage {
            Some(stage) => sqlx::query_scalar(
                r#"
                select count(*)::bigint
                from pools p
                join legs l on l.pool_id = p.id
                join matches m on m.id = l.match_id
                where m.event_id = $1 and p.pool_type = $2 and m.event_stage = $3
                "#,
            )
            .bind(event_id)
            .bind(pool_type.as_str())
            .bind(stage)
            .fetch_one(&self.pool)
            .await
            .context("has_pool_for_event (stage) failed")?,
            None => sqlx::query_scalar(
                r#"
                select count(*)::bigint
                from pools p
                join legs l on l.pool_id = p.id
                join matches m on m.id = l.match_id
                where m.event_id = $1 and p.pool_type = $2
                "#,
            )
            .bind(event_id)
            .bind(pool_type.as_str())
            .fetch_one(&self.pool)
            .await
            .context("has_pool_for_event failed")?,
        };
        Ok(count > 0)
    }

    async fn insert_pool(&self, pool: &Pool) -> Result<()> {
        sqlx::query(
            r#"
            insert into pools (
              id, name, pool_type, sync_status, note, game, currency,
              unit_value, min_unit_per_line, max_unit_per_line,
              min_unit_per_ticket, max_unit_per_ticket, guarantee, carry_in,
              allocation, is_active, is_autogenerated, last_sync_time
            ) values (
              $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
              $15, $16, $17, $18
            )
            "#,
        )
        .bind(pool.id)
        .bind(&pool.name)
        .bind(pool.pool_type.as_str())
        .bind(pool.sync_status.as_str())
        .bind(&pool.note)
        .bind(pool.game.as_str())
        .bind(pool.currency.as_str())
        .bind(pool.unit_value)
        .bind(pool.min_unit_per_line)
        .bind(pool.max_unit_per_line)
        .bind(pool.min_unit_per_ticket)
        .bind(pool.max_unit_per_ticket)
        .bind(pool.guarantee)
        .bind(pool.carry_in)
        .bind(pool.allocation)
        .bind(pool.is_active)
        .bind(pool.is_autogenerated)
        .bind(pool.last_sync_time)
        .execute(&self.pool)
        .await
        .context("insert_pool failed")?;
        Ok(())
    }

    async fn insert_leg(&self, leg: &Leg) -> Result<()> {
        sqlx::query(
            "insert into legs (id, pool_id, match_id, threshold, last_sync_time) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(leg.id)
        .bind(leg.pool_id)
        .bind(leg.match_id)
        .bind(leg.threshold)
        .bind(leg.last_sync_time)
        .execute(&self.pool)
        .await
        .context("insert_leg failed")?;
        Ok(())
    }

    async fn over_under_default(
        &self,
        game: Game,
        format: MatchFormat,
    ) -> Result<Option<OverUnderDefault>> {
        let row = sqlx::query(
            "select id, game, match_format, even_threshold, favored_threshold, note \
             from over_under_defaults where game = $1 and match_format = $2 limit 1",
        )
        .bind(game.as_str())
        .bind(format.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("over_under_default query failed")?;

        let Some(row) = row else { return Ok(None) };
        Ok(Some(OverUnderDefault {
            id: row.try_get("id")?,
            game: Game::parse(row.try_get::<&str, _>("game")?)?,
            match_format: MatchFormat::parse(row.try_get::<&str, _>("match_format")?)?,
            even_threshold: row.try_get("even_threshold")?,
            favored_threshold: row.try_get("favored_threshold")?,
            note: row.try_get("note")?,
        }))
    }

    async fn over_under_defaults_count(
        &self,
        game: Game,
        formats: &[MatchFormat],
    ) -> Result<i64> {
        let formats: Vec<&str> = formats.iter().map(|f| f.as_str()).collect();
        let count: i64 = sqlx::query_scalar(
            "select count(*)::bigint from over_under_defaults \
             where game = $1 and match_format = any($2)",
        )
        .bind(game.as_str())
        .bind(&formats)
        .fetch_one(&self.pool)
        .await
        .context("over_under_defaults_count failed")?;
        Ok(count)
    }
}
