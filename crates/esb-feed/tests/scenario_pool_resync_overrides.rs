//! Remote state wins during pool resync: a 404 means the pool was never
//! created and maps back to Approved, and a settlement timestamp on the
//! response overrides whatever status the exchange reports.

use std::sync::Arc;
use std::time::Duration;

use esb_exchange::{ExchangePoolStatus, SportEventStatus};
use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatch, ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, ExchangeCall, MemoryStore, ScriptedExchange};
use uuid::Uuid;

fn seed_pool_with_legs(
    store: &MemoryStore,
    exchange: &ScriptedExchange,
    sync_status: PoolSyncStatus,
    cm_status: ColossusMatchStatus,
) -> uuid::Uuid {
    let event = testkit::event(Game::Csgo);
    let pool = testkit::pool(Game::Csgo, PoolType::H2h, sync_status);
    let pool_id = pool.id;

    for hours in [1, 2, 3, 4] {
        let m = testkit::scheduled_match(event.id, "finals", hours);
        let cm = ColossusMatch {
            id: Uuid::new_v4(),
            match_id: m.id,
            pool_type: PoolType::H2h,
            status: cm_status,
        };
        exchange.put_event(
            &cm.exchange_id(),
            match cm_status {
                ColossusMatchStatus::NotStarted => SportEventStatus::NotStarted,
                _ => SportEventStatus::Official,
            },
        );
        store.seed_leg(testkit::leg(pool_id, m.id, None));
        store.seed_match(m);
        store.seed_colossus_match(cm);
    }
    store.seed_event(event);
    store.seed_pool(pool);
    pool_id
}

#[tokio::test]
async fn not_found_maps_to_approved_and_recreates() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    // Locally the pool believes it is trading, but the exchange has no
    // record of it; resync walks it back and the go-live chain re-runs.
    let pool_id = seed_pool_with_legs(
        &store,
        &exchange,
        PoolSyncStatus::TradingOpen,
        ColossusMatchStatus::NotStarted,
    );
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    assert_eq!(store.pool(pool_id).unwrap().sync_status, PoolSyncStatus::TradingOpen);
    assert!(exchange
        .calls_for(&pool_id.to_string())
        .contains(&ExchangeCall::CreatePool(pool_id.to_string())));
}

#[tokio::test]
async fn settlement_timestamp_overrides_reported_status() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let pool_id = seed_pool_with_legs(
        &store,
        &exchange,
        PoolSyncStatus::TradingClosed,
        ColossusMatchStatus::Official,
    );
    // The exchange still reports Open, but the settlement timestamp wins.
    exchange.put_settled_pool(&pool_id.to_string(), ExchangePoolStatus::Open);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    assert_eq!(store.pool(pool_id).unwrap().sync_status, PoolSyncStatus::Settled);
    assert!(!exchange
        .calls_for(&pool_id.to_string())
        .contains(&ExchangeCall::SettlePool(pool_id.to_string())));
}
