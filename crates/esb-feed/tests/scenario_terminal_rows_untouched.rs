//! Official and Abandoned linkage rows are terminal: never resynced, never
//! passed to the transition function.

use std::sync::Arc;
use std::time::Duration;

use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatch, ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, MemoryStore, ScriptedExchange};
use uuid::Uuid;

#[tokio::test]
async fn official_and_abandoned_rows_are_skipped() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Csgo);
    let pool = testkit::pool(Game::Csgo, PoolType::OverUnder, PoolSyncStatus::NotReady);

    let mut exchange_ids = Vec::new();
    for status in [ColossusMatchStatus::Official, ColossusMatchStatus::Abandoned] {
        let m = testkit::scheduled_match(event.id, "finals", 1);
        let cm = ColossusMatch {
            id: Uuid::new_v4(),
            match_id: m.id,
            pool_type: PoolType::OverUnder,
            status,
        };
        exchange_ids.push(cm.exchange_id());
        store.seed_leg(testkit::leg(pool.id, m.id, None));
        store.seed_match(m);
        store.seed_colossus_match(cm.clone());
    }
    store.seed_event(event);
    store.seed_pool(pool);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    for exchange_id in &exchange_ids {
        assert!(exchange.calls_for(exchange_id).is_empty());
    }
}
