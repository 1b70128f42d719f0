//! Once any leg's match has started, a trading-open pool is closed locally
//! only. The exchange stops new purchases itself when a leg progresses;
//! issuing a remote trading-disable would block settlement.

use std::sync::Arc;
use std::time::Duration;

use esb_exchange::{ExchangePoolStatus, SportEventStatus};
use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{
    ColossusMatch, ColossusMatchStatus, Game, MatchInternalStatus, PoolSyncStatus, PoolType,
};
use esb_testkit::{self as testkit, ExchangeCall, MemoryStore, ScriptedExchange};
use uuid::Uuid;

#[tokio::test]
async fn started_match_closes_trading_locally_only() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::Dota2);
    let pool = testkit::pool(Game::Dota2, PoolType::H2h, PoolSyncStatus::TradingOpen);
    let pool_id = pool.id;
    exchange.put_pool(&pool_id.to_string(), ExchangePoolStatus::Open);

    for (idx, hours) in [0, 1, 2, 3].into_iter().enumerate() {
        let mut m = testkit::scheduled_match(event.id, "groups", hours);
        let status = if idx == 0 {
            // First leg is already being played.
            m.internal_status = MatchInternalStatus::InProgress;
            ColossusMatchStatus::InPlay
        } else {
            ColossusMatchStatus::NotStarted
        };
        let cm = ColossusMatch {
            id: Uuid::new_v4(),
            match_id: m.id,
            pool_type: PoolType::H2h,
            status,
        };
        exchange.put_event(
            &cm.exchange_id(),
            match status {
                ColossusMatchStatus::InPlay => SportEventStatus::InPlay,
                _ => SportEventStatus::NotStarted,
            },
        );
        store.seed_leg(testkit::leg(pool_id, m.id, None));
        store.seed_match(m);
        store.seed_colossus_match(cm);
    }
    store.seed_event(event);
    store.seed_pool(pool);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert!(outcomes.iter().all(|o| o.is_ok()), "{outcomes:?}");

    assert_eq!(
        store.pool(pool_id).unwrap().sync_status,
        PoolSyncStatus::TradingClosed
    );

    // No trading toggle of any kind went out.
    assert!(!exchange
        .calls()
        .iter()
        .any(|c| matches!(c, ExchangeCall::ToggleTrading(_, _))));
}
