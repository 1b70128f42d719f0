//! A match that left scheduling before its sport event was ever created
//! can no longer be offered: its legs are deleted and the linkage row
//! stays at Unknown.

use std::sync::Arc;
use std::time::Duration;

use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{
    ColossusMatch, ColossusMatchStatus, Game, MatchInternalStatus, PoolSyncStatus, PoolType,
};
use esb_testkit::{self as testkit, MemoryStore, ScriptedExchange};
use uuid::Uuid;

#[tokio::test]
async fn match_that_started_before_creation_loses_its_legs() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Csgo);
    let mut m = testkit::scheduled_match(event.id, "group_a", 0);
    m.internal_status = MatchInternalStatus::InProgress;

    let pool = testkit::pool(Game::Csgo, PoolType::H2h, PoolSyncStatus::NotReady);
    let cm = ColossusMatch {
        id: Uuid::new_v4(),
        match_id: m.id,
        pool_type: PoolType::H2h,
        status: ColossusMatchStatus::Unknown,
    };

    store.seed_leg(testkit::leg(pool.id, m.id, None));
    let match_id = m.id;
    store.seed_event(event);
    store.seed_match(m);
    store.seed_pool(pool);
    store.seed_colossus_match(cm);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    assert!(store.legs_for_match(match_id).is_empty());
    assert_eq!(
        store.colossus_match(match_id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::Unknown
    );
    // Nothing was sent for it.
    assert!(exchange.calls().is_empty());
}
