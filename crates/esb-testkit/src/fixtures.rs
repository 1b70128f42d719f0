//! Builders for common test entities, seeded with plausible defaults.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use esb_models::{
    Competitor, Event, Game, Leg, Match, MatchFormat, MatchInternalStatus, OverUnderDefault,
    Pool, PoolCurrency, PoolDefault, PoolSyncStatus, PoolType,
};

pub fn event(game: Game) -> Event {
    Event {
        id: Uuid::new_v4(),
        name: "Test Invitational".to_string(),
        game,
    }
}

/// A two-competitor match with a 60/40 win-probability split, scheduled
/// `starts_in_hours` from now.
pub fn scheduled_match(event_id: Uuid, stage: &str, starts_in_hours: i64) -> Match {
    let home = Competitor {
        id: Uuid::new_v4(),
        external_id: "100".to_string(),
        name: "Team Alpha".to_string(),
    };
    let away = Competitor {
        id: Uuid::new_v4(),
        external_id: "200".to_string(),
        name: "Team Beta".to_string(),
    };

    let mut win_probabilities = HashMap::new();
    win_probabilities.insert(home.external_id.clone(), dec!(60));
    win_probabilities.insert(away.external_id.clone(), dec!(40));

    Match {
        id: Uuid::new_v4(),
        event_id,
        event_stage: stage.to_string(),
        format: MatchFormat::BestOf3,
        start_time: Utc::now() + Duration::hours(starts_in_hours),
        internal_status: MatchInternalStatus::Scheduled,
        competitors: vec![home, away],
        win_probabilities,
        scores: HashMap::new(),
        ou_scores: HashMap::new(),
    }
}

/// Records a 2-1 series result on both score maps.
pub fn record_result(m: &mut Match) {
    m.scores.insert("100".to_string(), 2);
    m.scores.insert("200".to_string(), 1);
    m.ou_scores.insert("100".to_string(), 2);
    m.ou_scores.insert("200".to_string(), 1);
}

pub fn pool(game: Game, pool_type: PoolType, sync_status: PoolSyncStatus) -> Pool {
    Pool {
        id: Uuid::new_v4(),
        name: "Test Pool".to_string(),
        pool_type,
        sync_status,
        note: String::new(),
        game,
        currency: PoolCurrency::Usd,
        unit_value: dec!(2),
        min_unit_per_line: dec!(0.1),
        max_unit_per_line: dec!(10),
        min_unit_per_ticket: dec!(0.1),
        max_unit_per_ticket: dec!(100),
        guarantee: dec!(500),
        carry_in: dec!(0),
        allocation: dec!(0),
        is_active: true,
        is_autogenerated: false,
        last_sync_time: None,
        legs: Vec::new(),
        consolations: Vec::new(),
    }
}

pub fn leg(pool_id: Uuid, match_id: Uuid, threshold: Option<Decimal>) -> Leg {
    Leg {
        id: Uuid::new_v4(),
        pool_id,
        match_id,
        threshold,
        last_sync_time: None,
    }
}

pub fn pool_default(game: Game, pool_type: PoolType, leg_count: i32) -> PoolDefault {
    PoolDefault {
        id: Uuid::new_v4(),
        leg_count,
        game,
        pool_type,
        currency: PoolCurrency::Usd,
        unit_value: dec!(2),
        min_unit_per_line: dec!(0.1),
        max_unit_per_line: dec!(10),
        min_unit_per_ticket: dec!(0.1),
        max_unit_per_ticket: dec!(100),
        guarantee: dec!(500),
        carry_in: dec!(0),
        allocation: dec!(0),
        note: String::new(),
    }
}

pub fn ou_default(game: Game, format: MatchFormat) -> OverUnderDefault {
    OverUnderDefault {
        id: Uuid::new_v4(),
        game,
        match_format: format,
        even_threshold: dec!(2.5),
        favored_threshold: dec!(1.5),
        note: String::new(),
    }
}
