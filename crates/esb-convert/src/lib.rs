//! esb-convert
//!
//! Stateless translation between the internal vocabulary (`esb-models`) and
//! the exchange wire vocabulary (`esb-exchange`).
//!
//! Mappings *into* the internal enums are total; mappings *out* are partial
//! because several internal states (NotReady, SyncError, ...) have no remote
//! counterpart and reaching them here is a programming error surfaced as
//! `Err`, never a panic.

use anyhow::{bail, Result};
use rust_decimal::Decimal;

use esb_exchange::{
    CompetitorResult, EventMarket, EventProbabilitiesPayload, EventResultsPayload,
    ExchangePoolStatus, ExchangePoolType, MarketSelection, PoolCreatePayload, PoolLegPayload,
    PoolPrizePayload, SportEventCompetitorPayload, SportEventPayload, SportEventStatus,
    PRIZE_TYPE_CONSOLATIONS, PRIZE_TYPE_WIN, SPORT_CODE_ESPORTS, VENUE_ESPORTS_ARENA,
};
use esb_models::{
    odds, ColossusMatch, ColossusMatchStatus, Game, Match, Pool, PoolSyncStatus, PoolType,
};

pub fn to_exchange_pool_type(pool_type: PoolType) -> ExchangePoolType {
    match pool_type {
        PoolType::H2h => ExchangePoolType::HeadToHead,
        PoolType::OverUnder => ExchangePoolType::OverUnder,
    }
}

pub fn from_exchange_pool_status(status: ExchangePoolStatus) -> PoolSyncStatus {
    match status {
        ExchangePoolStatus::Created => PoolSyncStatus::Created,
        ExchangePoolStatus::Open => PoolSyncStatus::TradingOpen,
        ExchangePoolStatus::InPlay => PoolSyncStatus::TradingClosed,
        ExchangePoolStatus::Official => PoolSyncStatus::Official,
        ExchangePoolStatus::Abandoned => PoolSyncStatus::Abandoned,
    }
}

pub fn to_exchange_pool_status(status: PoolSyncStatus) -> Result<ExchangePoolStatus> {
    Ok(match status {
        PoolSyncStatus::Created => ExchangePoolStatus::Created,
        PoolSyncStatus::TradingOpen => ExchangePoolStatus::Open,
        PoolSyncStatus::TradingClosed => ExchangePoolStatus::InPlay,
        PoolSyncStatus::Official | PoolSyncStatus::Settled => ExchangePoolStatus::Official,
        PoolSyncStatus::Abandoned => ExchangePoolStatus::Abandoned,
        other => bail!("can't map internal pool status {} to an exchange status", other.as_str()),
    })
}

pub fn from_exchange_event_status(status: SportEventStatus) -> ColossusMatchStatus {
    match status {
        SportEventStatus::NotStarted => ColossusMatchStatus::NotStarted,
        SportEventStatus::InPlay => ColossusMatchStatus::InPlay,
        SportEventStatus::Completed => ColossusMatchStatus::Completed,
        SportEventStatus::Official => ColossusMatchStatus::Official,
        SportEventStatus::Abandoned => ColossusMatchStatus::Abandoned,
    }
}

pub fn to_exchange_event_status(status: ColossusMatchStatus) -> Result<SportEventStatus> {
    Ok(match status {
        ColossusMatchStatus::NotStarted => SportEventStatus::NotStarted,
        ColossusMatchStatus::InPlay => SportEventStatus::InPlay,
        ColossusMatchStatus::Completed => SportEventStatus::Completed,
        ColossusMatchStatus::Official => SportEventStatus::Official,
        ColossusMatchStatus::Abandoned => SportEventStatus::Abandoned,
        other => bail!(
            "can't map colossus match status {} to a sport event status",
            other.as_str()
        ),
    })
}

/// Builds the remote pool creation payload from an approved pool and its
/// ordered legs.
pub fn to_pool_create(pool: &Pool) -> Result<PoolCreatePayload> {
    let mut pool_prizes = vec![PoolPrizePayload {
        guarantee: pool.guarantee,
        carry_in: pool.carry_in,
        allocation: pool.allocation,
        prize_type_code: PRIZE_TYPE_WIN.to_string(),
    }];

    for (idx, consolation) in pool.consolations.iter().enumerate() {
        let Some(code) = PRIZE_TYPE_CONSOLATIONS.get(idx) else {
            bail!("invalid number of consolation prizes in pool {}", pool.id);
        };
        pool_prizes.push(PoolPrizePayload {
            guarantee: consolation.guarantee,
            carry_in: consolation.carry_in,
            allocation: consolation.allocation,
            prize_type_code: (*code).to_string(),
        });
    }

    let mut legs = Vec::with_capacity(pool.legs.len());
    for (idx, leg) in pool.legs.iter().enumerate() {
        let over_under_threshold = match pool.pool_type {
            PoolType::H2h => None,
            PoolType::OverUnder => match leg.threshold {
                Some(t) => Some(t),
                None => bail!("can't create over/under leg {} without a threshold", leg.id),
            },
        };
        legs.push(PoolLegPayload {
            leg_order: idx + 1,
            sport_event_ext_id: format!("{}-{}", leg.match_id, pool.pool_type.exchange_suffix()),
            over_under_threshold,
        });
    }

    Ok(PoolCreatePayload {
        ext_id: pool.id.to_string(),
        sport_code: SPORT_CODE_ESPORTS.to_string(),
        name_code: pool.game.exchange_code().to_string(),
        type_code: to_exchange_pool_type(pool.pool_type),
        unit_value: pool.unit_value,
        min_unit_per_line: pool.min_unit_per_line,
        max_unit_per_line: pool.max_unit_per_line,
        min_unit_per_ticket: pool.min_unit_per_ticket,
        max_unit_per_ticket: pool.max_unit_per_ticket,
        currency: pool.currency.as_str().to_string(),
        num_legs: pool.legs.len(),
        legs,
        pool_prizes,
    })
}

/// Builds the sport event creation payload for one (match, pool type) pair.
/// Competitor odds are renormalized against the book total.
pub fn to_sport_event(cm: &ColossusMatch, m: &Match, game: Game) -> Result<SportEventPayload> {
    let total = m.total_win_probability();
    let mut competitors = Vec::with_capacity(m.competitors.len());

    for (idx, team) in m.competitors.iter().enumerate() {
        let probability = m
            .win_probabilities
            .get(&team.external_id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        competitors.push(SportEventCompetitorPayload {
            ext_id: team.id.to_string(),
            name: team.name.clone(),
            display_order: idx + 1,
            cloth_number: idx + 1,
            decimal_odds: odds::normalize_decimal_odds(probability, total),
            fractional_odds: odds::implied_probability_to_fractional_odds(probability)?,
            withdrawn: false,
            add_info_json: String::new(),
        });
    }

    Ok(SportEventPayload {
        ext_id: cm.exchange_id(),
        name: format!("{} {}", m.event_stage, m.id),
        sport_sub_code: game.exchange_code().to_string(),
        scheduled_start: m.start_time,
        venue: VENUE_ESPORTS_ARENA.to_string(),
        competitors,
        add_info_json: String::new(),
    })
}

/// Builds the probabilities payload with a single untagged market; the match
/// synchronizer clones it once per linked pool and fills in the pool id.
pub fn to_event_probabilities(
    m: &Match,
    pool_type: PoolType,
) -> Result<EventProbabilitiesPayload> {
    match to_exchange_pool_type(pool_type) {
        ExchangePoolType::HeadToHead => to_h2h_probabilities(m),
        ExchangePoolType::OverUnder => to_over_under_probabilities(m),
    }
}

/// H2H markets are fixed three-way: home / draw / away. The draw probability
/// is derived as the remainder after both competitors.
fn to_h2h_probabilities(m: &Match) -> Result<EventProbabilitiesPayload> {
    if m.competitors.len() != 2 {
        bail!("can't build an H2H market with {} teams", m.competitors.len());
    }

    let fallback = Decimal::new(5, 1);
    let mut selections = vec![MarketSelection::default(); 3];
    let mut remainder = Decimal::ONE;

    for (idx, team) in m.competitors.iter().enumerate() {
        // Competitors occupy the outer selections; slot 1 is the draw.
        let slot = if idx == 0 { 0 } else { idx + 1 };
        let probability = m
            .win_probabilities
            .get(&team.external_id)
            .map(|p| *p / Decimal::ONE_HUNDRED)
            .unwrap_or(fallback);
        remainder -= probability;
        selections[slot] = MarketSelection {
            selection_order: (slot + 1).to_string(),
            probability,
        };
    }

    selections[1] = MarketSelection {
        selection_order: "2".to_string(),
        probability: remainder,
    };

    Ok(EventProbabilitiesPayload {
        markets: vec![EventMarket {
            type_code: ExchangePoolType::HeadToHead,
            selections,
            pool_id: String::new(),
        }],
    })
}

fn to_over_under_probabilities(m: &Match) -> Result<EventProbabilitiesPayload> {
    let fallback = Decimal::new(5, 1);
    let selections = m
        .competitors
        .iter()
        .enumerate()
        .map(|(idx, team)| MarketSelection {
            selection_order: (idx + 1).to_string(),
            probability: m
                .win_probabilities
                .get(&team.external_id)
                .map(|p| *p / Decimal::ONE_HUNDRED)
                .unwrap_or(fallback),
        })
        .collect();

    Ok(EventProbabilitiesPayload {
        markets: vec![EventMarket {
            type_code: ExchangePoolType::OverUnder,
            selections,
            pool_id: String::new(),
        }],
    })
}

/// Builds the results payload; H2H settles on match scores, over/under on
/// the over/under score line.
pub fn to_event_results(cm: &ColossusMatch, m: &Match) -> EventResultsPayload {
    let scores = match cm.pool_type {
        PoolType::H2h => &m.scores,
        PoolType::OverUnder => &m.ou_scores,
    };

    let results = m
        .competitors
        .iter()
        .filter_map(|team| {
            scores.get(&team.external_id).map(|score| CompetitorResult {
                ext_id: team.id.to_string(),
                result: *score,
            })
        })
        .collect();

    EventResultsPayload { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use esb_models::{
        Competitor, ConsolationPrize, Leg, MatchFormat, MatchInternalStatus, PoolCurrency,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn competitor(ext: &str) -> Competitor {
        Competitor {
            id: Uuid::new_v4(),
            external_id: ext.to_string(),
            name: ext.to_uppercase(),
        }
    }

    fn match_with_probs(a: Decimal, b: Decimal) -> Match {
        let home = competitor("home");
        let away = competitor("away");
        Match {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            event_stage: "group_a".to_string(),
            format: MatchFormat::BestOf3,
            start_time: Utc::now(),
            internal_status: MatchInternalStatus::Scheduled,
            win_probabilities: [
                (home.external_id.clone(), a),
                (away.external_id.clone(), b),
            ]
            .into(),
            scores: [(home.external_id.clone(), 2), (away.external_id.clone(), 1)].into(),
            ou_scores: [(home.external_id.clone(), 16), (away.external_id.clone(), 9)].into(),
            competitors: vec![home, away],
        }
    }

    fn pool_with_legs(pool_type: PoolType, legs: usize, threshold: Option<Decimal>) -> Pool {
        let id = Uuid::new_v4();
        Pool {
            id,
            name: "Group A Legs 4".to_string(),
            pool_type,
            sync_status: PoolSyncStatus::Approved,
            note: String::new(),
            game: Game::Csgo,
            currency: PoolCurrency::Str,
            unit_value: dec!(1),
            min_unit_per_line: dec!(1),
            max_unit_per_line: dec!(1),
            min_unit_per_ticket: dec!(1),
            max_unit_per_ticket: dec!(500),
            guarantee: dec!(1000),
            carry_in: dec!(0),
            allocation: dec!(0.9),
            is_active: true,
            is_autogenerated: true,
            last_sync_time: None,
            legs: (0..legs)
                .map(|_| Leg {
                    id: Uuid::new_v4(),
                    pool_id: id,
                    match_id: Uuid::new_v4(),
                    threshold,
                    last_sync_time: None,
                })
                .collect(),
            consolations: Vec::new(),
        }
    }

    #[test]
    fn pool_status_maps_both_ways() {
        assert_eq!(
            from_exchange_pool_status(ExchangePoolStatus::Open),
            PoolSyncStatus::TradingOpen
        );
        assert_eq!(
            from_exchange_pool_status(ExchangePoolStatus::InPlay),
            PoolSyncStatus::TradingClosed
        );
        assert_eq!(
            to_exchange_pool_status(PoolSyncStatus::Settled).unwrap(),
            ExchangePoolStatus::Official
        );
        assert!(to_exchange_pool_status(PoolSyncStatus::NotReady).is_err());
    }

    #[test]
    fn event_status_out_mapping_rejects_local_only_states() {
        assert!(to_exchange_event_status(ColossusMatchStatus::Unknown).is_err());
        assert!(to_exchange_event_status(ColossusMatchStatus::SyncError).is_err());
        assert_eq!(
            to_exchange_event_status(ColossusMatchStatus::InPlay).unwrap(),
            SportEventStatus::InPlay
        );
    }

    #[test]
    fn h2h_draw_probability_is_the_remainder() {
        let m = match_with_probs(dec!(50), dec!(30));
        let payload = to_event_probabilities(&m, PoolType::H2h).unwrap();
        let selections = &payload.markets[0].selections;
        assert_eq!(selections.len(), 3);
        assert_eq!(selections[0].probability, dec!(0.5));
        assert_eq!(selections[2].probability, dec!(0.3));
        assert_eq!(selections[1].probability, dec!(0.2));
        assert_eq!(selections[1].selection_order, "2");
    }

    #[test]
    fn missing_probability_falls_back_to_even() {
        let mut m = match_with_probs(dec!(50), dec!(50));
        m.win_probabilities.clear();
        let payload = to_event_probabilities(&m, PoolType::OverUnder).unwrap();
        for sel in &payload.markets[0].selections {
            assert_eq!(sel.probability, dec!(0.5));
        }
    }

    #[test]
    fn over_under_legs_require_thresholds() {
        let good = pool_with_legs(PoolType::OverUnder, 4, Some(dec!(26.5)));
        let payload = to_pool_create(&good).unwrap();
        assert_eq!(payload.num_legs, 4);
        assert!(payload.legs.iter().all(|l| l.over_under_threshold.is_some()));
        assert!(payload.legs[0].sport_event_ext_id.ends_with("-OU"));

        let bad = pool_with_legs(PoolType::OverUnder, 4, None);
        assert!(to_pool_create(&bad).is_err());
    }

    #[test]
    fn h2h_legs_carry_no_threshold_and_leg_order_is_positional() {
        let pool = pool_with_legs(PoolType::H2h, 4, None);
        let payload = to_pool_create(&pool).unwrap();
        let orders: Vec<usize> = payload.legs.iter().map(|l| l.leg_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert!(payload.legs.iter().all(|l| l.over_under_threshold.is_none()));
        assert!(payload.legs[0].sport_event_ext_id.ends_with("-H2H"));
    }

    #[test]
    fn more_than_three_consolations_is_rejected() {
        let mut pool = pool_with_legs(PoolType::H2h, 4, None);
        pool.consolations = (0..4)
            .map(|_| ConsolationPrize {
                id: Uuid::new_v4(),
                pool_id: pool.id,
                guarantee: dec!(100),
                carry_in: dec!(0),
                allocation: dec!(0.1),
            })
            .collect();
        assert!(to_pool_create(&pool).is_err());

        pool.consolations.truncate(2);
        let payload = to_pool_create(&pool).unwrap();
        let codes: Vec<&str> = payload
            .pool_prizes
            .iter()
            .map(|p| p.prize_type_code.as_str())
            .collect();
        assert_eq!(codes, vec!["WIN", "CON_N1", "CON_N2"]);
    }

    #[test]
    fn results_pick_the_score_line_for_the_pool_type() {
        let m = match_with_probs(dec!(50), dec!(50));
        let cm = ColossusMatch {
            id: Uuid::new_v4(),
            match_id: m.id,
            pool_type: PoolType::OverUnder,
            status: ColossusMatchStatus::InPlay,
        };
        let payload = to_event_results(&cm, &m);
        let results: Vec<i32> = payload.results.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![16, 9]);

        let cm_h2h = ColossusMatch { pool_type: PoolType::H2h, ..cm };
        let payload = to_event_results(&cm_h2h, &m);
        let results: Vec<i32> = payload.results.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![2, 1]);
    }
}
