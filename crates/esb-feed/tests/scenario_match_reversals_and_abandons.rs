//! Backward transitions: cancelled matches abandon their remote events,
//! and matches that drop back into scheduling or play are reversed the
//! matching number of times.

use std::sync::Arc;
use std::time::Duration;

use esb_exchange::SportEventStatus;
use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{
    ColossusMatch, ColossusMatchStatus, Game, MatchInternalStatus, PoolSyncStatus, PoolType,
};
use esb_testkit::{self as testkit, ExchangeCall, MemoryStore, ScriptedExchange};
use uuid::Uuid;

struct Harness {
    store: MemoryStore,
    exchange: Arc<ScriptedExchange>,
    match_id: Uuid,
    exchange_id: String,
}

fn seed(
    internal: MatchInternalStatus,
    remote: SportEventStatus,
    local: ColossusMatchStatus,
) -> Harness {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Dota2);
    let mut m = testkit::scheduled_match(event.id, "groups", 1);
    m.internal_status = internal;

    let pool = testkit::pool(Game::Dota2, PoolType::H2h, PoolSyncStatus::NotReady);
    let cm = ColossusMatch {
        id: Uuid::new_v4(),
        match_id: m.id,
        pool_type: PoolType::H2h,
        status: local,
    };
    let exchange_id = cm.exchange_id();
    exchange.put_event(&exchange_id, remote);

    store.seed_leg(testkit::leg(pool.id, m.id, None));
    let match_id = m.id;
    store.seed_event(event);
    store.seed_match(m);
    store.seed_pool(pool);
    store.seed_colossus_match(cm);
    store.activate_feed();

    Harness {
        store,
        exchange,
        match_id,
        exchange_id,
    }
}

async fn run(h: &Harness) {
    let feeder = ExchangeFeeder::new(
        h.store.clone(),
        h.exchange.clone(),
        Duration::from_secs(60),
    );
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");
}

#[tokio::test]
async fn cancelled_in_play_match_is_abandoned() {
    let h = seed(
        MatchInternalStatus::Cancelled,
        SportEventStatus::InPlay,
        ColossusMatchStatus::InPlay,
    );
    run(&h).await;

    assert_eq!(
        h.store.colossus_match(h.match_id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::Abandoned
    );
    assert!(h
        .exchange
        .calls_for(&h.exchange_id)
        .contains(&ExchangeCall::Abandon(h.exchange_id.clone())));
}

#[tokio::test]
async fn rescheduled_completed_match_reverses_twice() {
    let h = seed(
        MatchInternalStatus::Scheduled,
        SportEventStatus::Completed,
        ColossusMatchStatus::Completed,
    );
    run(&h).await;

    assert_eq!(
        h.store.colossus_match(h.match_id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::NotStarted
    );
    let reversals = h
        .exchange
        .calls_for(&h.exchange_id)
        .into_iter()
        .filter(|c| matches!(c, ExchangeCall::Reverse(_)))
        .count();
    assert_eq!(reversals, 2);
    assert_eq!(
        h.exchange.event_status(&h.exchange_id),
        Some(SportEventStatus::NotStarted)
    );
}

#[tokio::test]
async fn resumed_completed_match_reverses_once() {
    let h = seed(
        MatchInternalStatus::InProgress,
        SportEventStatus::Completed,
        ColossusMatchStatus::Completed,
    );
    run(&h).await;

    assert_eq!(
        h.store.colossus_match(h.match_id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::InPlay
    );
    assert_eq!(
        h.exchange.event_status(&h.exchange_id),
        Some(SportEventStatus::InPlay)
    );
}

#[tokio::test]
async fn delayed_in_play_match_reverses_to_not_started() {
    let h = seed(
        MatchInternalStatus::Delayed,
        SportEventStatus::InPlay,
        ColossusMatchStatus::InPlay,
    );
    run(&h).await;

    assert_eq!(
        h.store.colossus_match(h.match_id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::NotStarted
    );
}
