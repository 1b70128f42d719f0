//! An approved pool whose leg count the exchange would reject goes back to
//! NeedsApproval with the reason appended to its note, and never reaches
//! the exchange.

use std::sync::Arc;
use std::time::Duration;

use esb_exchange::SportEventStatus;
use esb_feed::{ExchangeFeeder, Feeder};
use esb_models::{ColossusMatch, ColossusMatchStatus, Game, PoolSyncStatus, PoolType};
use esb_testkit::{self as testkit, MemoryStore, ScriptedExchange};
use uuid::Uuid;

#[tokio::test]
async fn three_leg_pool_is_sent_back_for_review() {
    let store = MemoryStore::new();
    let exchange = Arc::new(ScriptedExchange::new());

    let event = testkit::event(Game::LeagueOfLegends);
    let pool = testkit::pool(
        Game::LeagueOfLegends,
        PoolType::H2h,
        PoolSyncStatus::Approved,
    );
    let pool_id = pool.id;

    for hours in [1, 2, 3] {
        let m = testkit::scheduled_match(event.id, "semis", hours);
        let cm = ColossusMatch {
            id: Uuid::new_v4(),
            match_id: m.id,
            pool_type: PoolType::H2h,
            status: ColossusMatchStatus::NotStarted,
        };
        exchange.put_event(&cm.exchange_id(), SportEventStatus::NotStarted);
        store.seed_leg(testkit::leg(pool.id, m.id, None));
        store.seed_match(m);
        store.seed_colossus_match(cm);
    }
    store.seed_event(event);
    store.seed_pool(pool);
    store.activate_feed();

    let feeder = ExchangeFeeder::new(store.clone(), exchange.clone(), Duration::from_secs(60));
    let outcomes = feeder.run_pass().await;
    assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 1);

    let pool = store.pool(pool_id).unwrap();
    assert_eq!(pool.sync_status, PoolSyncStatus::NeedsApproval);
    assert!(pool.note.contains("4/6/8/10"), "{}", pool.note);

    // The pool itself was never offered or even resynced.
    assert!(exchange.calls_for(&pool_id.to_string()).is_empty());
}
