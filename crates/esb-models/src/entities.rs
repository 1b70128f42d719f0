use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::odds;
use crate::{
    ColossusMatchStatus, Game, MatchFormat, MatchInternalStatus, PoolCurrency, PoolSyncStatus,
    PoolType,
};

/// A tournament (or tournament stage container) a match belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub game: Game,
}

/// One team taking part in matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: Uuid,
    /// Identifier at the upstream odds provider; win-probability and score
    /// maps on [`Match`] are keyed by this.
    pub external_id: String,
    pub name: String,
}

/// A single esports match with its betting-relevant markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_stage: String,
    pub format: MatchFormat,
    pub start_time: DateTime<Utc>,
    pub internal_status: MatchInternalStatus,
    pub competitors: Vec<Competitor>,
    /// Win probability per competitor external id, on a 0..100 scale.
    pub win_probabilities: HashMap<String, Decimal>,
    /// Final map/series score per competitor external id.
    pub scores: HashMap<String, i32>,
    /// Over/under-relevant score per competitor external id.
    pub ou_scores: HashMap<String, i32>,
}

impl Match {
    /// Sum of all competitor win probabilities; used to renormalize odds.
    pub fn total_win_probability(&self) -> Decimal {
        self.win_probabilities.values().copied().sum()
    }
}

/// One match-submarket inside a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub match_id: Uuid,
    /// Only set for over/under pools.
    pub threshold: Option<Decimal>,
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// Extra prize tier attached to a pool (up to three).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolationPrize {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub guarantee: Decimal,
    pub carry_in: Decimal,
    pub allocation: Decimal,
}

/// A wagering product composed of an ordered list of legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: Uuid,
    pub name: String,
    pub pool_type: PoolType,
    pub sync_status: PoolSyncStatus,
    pub note: String,
    pub game: Game,
    pub currency: PoolCurrency,
    pub unit_value: Decimal,
    pub min_unit_per_line: Decimal,
    pub max_unit_per_line: Decimal,
    pub min_unit_per_ticket: Decimal,
    pub max_unit_per_ticket: Decimal,
    pub guarantee: Decimal,
    pub carry_in: Decimal,
    pub allocation: Decimal,
    pub is_active: bool,
    pub is_autogenerated: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Ordered by match start time when loaded for synchronization.
    pub legs: Vec<Leg>,
    pub consolations: Vec<ConsolationPrize>,
}

/// Remote-linkage record correlating one (match, pool type) pair with its
/// sport-event representation on the exchange. Unique per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColossusMatch {
    pub id: Uuid,
    pub match_id: Uuid,
    pub pool_type: PoolType,
    pub status: ColossusMatchStatus,
}

impl ColossusMatch {
    /// Deterministic identifier of the sport event on the exchange:
    /// `{match_id}-H2H` or `{match_id}-OU`.
    pub fn exchange_id(&self) -> String {
        format!("{}-{}", self.match_id, self.pool_type.exchange_suffix())
    }
}

/// Configuration row with default sizing for generated pools of a given
/// (leg count, game, type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDefault {
    pub id: Uuid,
    pub leg_count: i32,
    pub game: Game,
    pub pool_type: PoolType,
    pub currency: PoolCurrency,
    pub unit_value: Decimal,
    pub min_unit_per_line: Decimal,
    pub max_unit_per_line: Decimal,
    pub min_unit_per_ticket: Decimal,
    pub max_unit_per_ticket: Decimal,
    pub guarantee: Decimal,
    pub carry_in: Decimal,
    pub allocation: Decimal,
    pub note: String,
}

/// Configuration row with over/under thresholds per (game, match format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverUnderDefault {
    pub id: Uuid,
    pub game: Game,
    pub match_format: MatchFormat,
    pub even_threshold: Decimal,
    pub favored_threshold: Decimal,
    pub note: String,
}

impl OverUnderDefault {
    /// Picks the favored-side threshold when any competitor's normalized
    /// decimal odds sit at or below 1.4, otherwise the even one.
    pub fn threshold_for(&self, win_probabilities: &HashMap<String, Decimal>) -> Decimal {
        let cutoff = Decimal::new(14, 1);
        let favored = win_probabilities
            .values()
            .any(|p| odds::normalize_decimal_odds(*p, Decimal::ONE_HUNDRED) <= cutoff);
        if favored {
            self.favored_threshold
        } else {
            self.even_threshold
        }
    }
}
