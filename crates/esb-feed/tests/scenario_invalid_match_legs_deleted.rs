//! A match without exactly two competitors can never be offered: its legs
//! are deleted, its linkage row keeps its status, and a second pass is a
//! no-op.

use std::sync::Arc;
use std::time::Duration;

use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatch, ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, MemoryStore, ScriptedExchange};
use uuid::Uuid;

#[tokio::test]
async fn one_competitor_match_gets_cleaned_up_idempotently() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Csgo);
    let mut m = testkit::scheduled_match(event.id, "group_b", 3);
    m.competitors.truncate(1);

    let pool = testkit::pool(Game::Csgo, PoolType::H2h, PoolSyncStatus::NotReady);
    store.seed_leg(testkit::leg(pool.id, m.id, None));

    let cm = ColossusMatch {
        id: Uuid::new_v4(),
        match_id: m.id,
        pool_type: PoolType::H2h,
        status: ColossusMatchStatus::NotStarted,
    };

    store.seed_event(event);
    store.seed_match(m.clone());
    store.seed_pool(pool);
    store.seed_colossus_match(cm);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));

    let outcomes = feeder.run_pass().await;
    assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 1);
    assert!(store.legs_for_match(m.id).is_empty());
    assert_eq!(
        store.colossus_match(m.id, PoolType::H2h).unwrap().status,
        ColossusMatchStatus::NotStarted
    );
    assert!(exchange.calls().is_empty());

    // With its legs gone the match is no longer eligible work.
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.is_empty(), "{outcomes:?}");
    assert!(exchange.calls().is_empty());
}
