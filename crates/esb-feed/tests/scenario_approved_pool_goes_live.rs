//! An approved 4-leg pool whose matches are all still scheduled goes live
//! in a single pass: sport events created with probabilities pushed, pool
//! created remotely, made visible, trading opened.

use std::sync::Arc;
use std::time::Duration;

use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, ExchangeCall, MemoryStore, ScriptedExchange};

#[tokio::test]
async fn approved_pool_goes_live_in_one_pass() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Csgo);
    let pool = testkit::pool(Game::Csgo, PoolType::H2h, PoolSyncStatus::Approved);
    let pool_id = pool.id;

    let mut match_ids = Vec::new();
    for hours in [2, 4, 6, 8] {
        let m = testkit::scheduled_match(event.id, "group_a", hours);
        match_ids.push(m.id);
        store.seed_leg(testkit::leg(pool.id, m.id, None));
        store.seed_match(m);
    }
    store.seed_event(event);
    store.seed_pool(pool);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    // Every match linkage reached NotStarted with event + probabilities sent.
    for match_id in &match_ids {
        let cm = store.colossus_match(*match_id, PoolType::H2h).unwrap();
        assert_eq!(cm.status, ColossusMatchStatus::NotStarted);

        let calls = exchange.calls_for(&cm.exchange_id());
        assert!(calls
            .iter()
            .any(|c| matches!(c, ExchangeCall::CreateSportEvent(_))));
        assert!(calls
            .iter()
            .any(|c| matches!(c, ExchangeCall::UpdateProbabilities(_, 1))));
    }

    // The pool chained create -> visible -> trading within the pass.
    let pool = store.pool(pool_id).unwrap();
    assert_eq!(pool.sync_status, PoolSyncStatus::TradingOpen);

    let pool_calls = exchange.calls_for(&pool_id.to_string());
    let expected_tail = [
        ExchangeCall::CreatePool(pool_id.to_string()),
        ExchangeCall::ToggleVisibility(pool_id.to_string(), true),
        ExchangeCall::ToggleTrading(pool_id.to_string(), true),
    ];
    assert!(
        pool_calls
            .windows(3)
            .any(|window| window == expected_tail),
        "{pool_calls:?}"
    );
}
