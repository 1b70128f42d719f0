//! A failure partway through the go-live chain (create, visible, trading)
//! persists the last stage actually reached; the following pass resyncs
//! against the exchange and completes the chain.

use std::sync::Arc;
use std::time::Duration;

use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, ExchangeCall, MemoryStore, ScriptedExchange};

#[tokio::test]
async fn trading_toggle_failure_parks_the_pool_mid_chain() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Csgo);
    let pool = testkit::pool(Game::Csgo, PoolType::H2h, PoolSyncStatus::Approved);
    let pool_id = pool.id;

    for hours in [2, 4, 6, 8] {
        let m = testkit::scheduled_match(event.id, "group_a", hours);
        store.seed_leg(testkit::leg(pool.id, m.id, None));
        store.seed_match(m);
    }
    store.seed_event(event);
    store.seed_pool(pool);
    store.activate_feed();

    exchange.fail_on("toggle_pool_trading");

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 1);

    // Create and visibility succeeded, so the row carries the furthest
    // stage reached rather than rolling back to Approved.
    let parked = store.pool(pool_id).unwrap();
    assert_eq!(parked.sync_status, PoolSyncStatus::Visible);
    let calls = exchange.calls_for(&pool_id.to_string());
    assert!(calls.contains(&ExchangeCall::CreatePool(pool_id.to_string())));
    assert!(calls.contains(&ExchangeCall::ToggleTrading(pool_id.to_string(), true)));

    // Matches were unaffected by the pool-side failure.
    for leg in store.legs_for_pool(pool_id) {
        let cm = store.colossus_match(leg.match_id, PoolType::H2h).unwrap();
        assert_eq!(cm.status, ColossusMatchStatus::NotStarted);
    }

    // Next pass: resync picks the pool up from the exchange's view and the
    // chain runs to completion.
    exchange.heal("toggle_pool_trading");
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");
    assert_eq!(
        store.pool(pool_id).unwrap().sync_status,
        PoolSyncStatus::TradingOpen
    );
}
