//! Match-side reconciliation.
//!
//! For every match that still backs at least one leg, and for every pool
//! type it participates in, the feeder find-or-creates the linkage record,
//! resyncs its remote status, applies one state transition keyed by
//! (remote status, internal status) and persists the row unconditionally.

use anyhow::{anyhow, bail, Context, Result};
use tracing::{error, warn};
use uuid::Uuid;

use esb_db::FeedStore;
use esb_exchange::{EventMarket, ExchangeApi, SportEventStatus};
use esb_models::{ColossusMatch, ColossusMatchStatus, Game, Match, MatchInternalStatus};

use crate::exchange_feed::ExchangeFeeder;
use crate::FeedOutcome;

impl<S, X> ExchangeFeeder<S, X>
where
    S: FeedStore + Send + Sync,
    X: ExchangeApi,
{
    pub(crate) async fn feed_matches(&self, outcomes: &mut Vec<FeedOutcome>) {
        let matches = match self.store.matches_with_legs().await {
            Ok(matches) => matches,
            Err(err) => {
                outcomes.push(Err(err.context("could not load matches for synchronization")));
                return;
            }
        };

        for m in &matches {
            if let Err(err) = self.feed_match(m, outcomes).await {
                outcomes.push(Err(err));
            }
        }
    }

    async fn feed_match(&self, m: &Match, outcomes: &mut Vec<FeedOutcome>) -> Result<()> {
        let event = self
            .store
            .event(m.event_id)
            .await
            .context("could not resolve the match's event")?;

        self.check_match_sendable(m)
            .await
            .context("not a valid match to send")?;

        for pool_type in self.store.pool_types_for_match(m.id).await? {
            let mut cm = match self.store.find_colossus_match(m.id, pool_type).await? {
                Some(cm) => cm,
                None => {
                    let cm = ColossusMatch {
                        id: Uuid::new_v4(),
                        match_id: m.id,
                        pool_type,
                        status: ColossusMatchStatus::Unknown,
                    };
                    self.store
                        .insert_colossus_match(&cm)
                        .await
                        .context("could not create exchange match record")?;
                    cm
                }
            };

            if cm.status.is_terminal() {
                continue;
            }

            // The match moved out of scheduling before it was ever sent; it
            // can no longer be offered, so its legs are cleaned up instead.
            if cm.status == ColossusMatchStatus::Unknown
                && !matches!(
                    m.internal_status,
                    MatchInternalStatus::Scheduled | MatchInternalStatus::Postponed
                )
            {
                self.delete_legs_logged(m.id).await;
                warn!(
                    exchange_id = %cm.exchange_id(),
                    internal_status = m.internal_status.as_str(),
                    "match left scheduling before reaching the exchange, legs deleted"
                );
                continue;
            }

            cm.status = match self.resync_match(&cm).await {
                Ok(status) => status,
                Err(err) => {
                    cm.status = ColossusMatchStatus::SyncError;
                    self.store
                        .update_colossus_match(&cm)
                        .await
                        .context("could not update exchange match record")?;
                    outcomes.push(Err(err));
                    continue;
                }
            };

            let transition = match cm.status {
                ColossusMatchStatus::Unknown => {
                    self.handle_match_unknown(&cm, m, event.game).await
                }
                ColossusMatchStatus::NotStarted => self.handle_match_not_started(&cm, m).await,
                ColossusMatchStatus::InPlay => self.handle_match_in_play(&cm, m).await,
                ColossusMatchStatus::Completed => self.handle_match_completed(&cm, m).await,
                _ => Ok(cm.status),
            };

            match transition {
                Ok(next) => cm.status = next,
                Err(err) => {
                    warn!(
                        match_id = %m.id,
                        exchange_id = %cm.exchange_id(),
                        "issue advancing match: {err:#}"
                    );
                    outcomes
                        .push(Err(err.context(format!(
                            "could not advance match {}",
                            cm.exchange_id()
                        ))));
                }
            }

            self.store
                .update_colossus_match(&cm)
                .await
                .context("could not update exchange match record")?;
        }

        Ok(())
    }

    /// A match needs exactly two competitors to build any submarket; a
    /// violation deletes its legs rather than failing the pass hard.
    async fn check_match_sendable(&self, m: &Match) -> Result<()> {
        if m.competitors.len() == 2 {
            return Ok(());
        }
        self.delete_legs_logged(m.id).await;
        bail!(
            "match needs 2 competitors to build a leg, found {}",
            m.competitors.len()
        )
    }

    async fn delete_legs_logged(&self, match_id: Uuid) {
        match self.store.delete_legs_for_match(match_id).await {
            Ok(deleted) => {
                if deleted > 0 {
                    warn!(%match_id, deleted, "deleted legs referencing unsendable match");
                }
            }
            Err(err) => error!(%match_id, "error deleting invalid legs: {err:#}"),
        }
    }

    /// Fetches the remote status. A 404 means the sport event was never
    /// created, which is a normal state, not an error.
    async fn resync_match(&self, cm: &ColossusMatch) -> Result<ColossusMatchStatus> {
        let exchange_id = cm.exchange_id();
        match self.exchange.sport_event_status(&exchange_id).await {
            Ok(resp) => {
                let status = resp.status.ok_or_else(|| {
                    anyhow!("could not resync match {exchange_id}, response carried no status")
                })?;
                Ok(esb_convert::from_exchange_event_status(status))
            }
            Err(err) if err.is_not_found() => Ok(ColossusMatchStatus::Unknown),
            Err(err) => Err(anyhow!(err)
                .context(format!("exchange returned an error resyncing match {exchange_id}"))),
        }
    }

    async fn handle_match_unknown(
        &self,
        cm: &ColossusMatch,
        m: &Match,
        game: Game,
    ) -> Result<ColossusMatchStatus> {
        if matches!(
            m.internal_status,
            MatchInternalStatus::Abandoned | MatchInternalStatus::Cancelled
        ) {
            return Ok(ColossusMatchStatus::Unknown);
        }

        let event_payload = esb_convert::to_sport_event(cm, m, game)?;
        self.exchange.create_sport_event(&event_payload).await?;

        // The converter produces one market; it is replicated per linked
        // pool so the exchange can price each pool's market individually.
        let mut probabilities = esb_convert::to_event_probabilities(m, cm.pool_type)?;
        let template = probabilities
            .markets
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("no market produced for match {}", m.id))?;
        let pool_ids = self.store.pools_linked_to_match(m.id, cm.pool_type).await?;
        probabilities.markets = pool_ids
            .iter()
            .map(|pool_id| EventMarket {
                pool_id: pool_id.to_string(),
                ..template.clone()
            })
            .collect();

        self.exchange
            .update_event_probabilities(&cm.exchange_id(), &probabilities)
            .await?;

        Ok(ColossusMatchStatus::NotStarted)
    }

    async fn handle_match_not_started(
        &self,
        cm: &ColossusMatch,
        m: &Match,
    ) -> Result<ColossusMatchStatus> {
        let exchange_id = cm.exchange_id();
        match m.internal_status {
            MatchInternalStatus::Abandoned | MatchInternalStatus::Cancelled => {
                self.exchange.abandon_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::Abandoned)
            }
            MatchInternalStatus::Closed
            | MatchInternalStatus::InProgress
            | MatchInternalStatus::Finished
            | MatchInternalStatus::Interrupted
            | MatchInternalStatus::Suspended => {
                self.exchange
                    .progress_sport_event(
                        &exchange_id,
                        SportEventStatus::NotStarted,
                        SportEventStatus::InPlay,
                    )
                    .await?;
                Ok(ColossusMatchStatus::InPlay)
            }
            _ => Ok(ColossusMatchStatus::NotStarted),
        }
    }

    async fn handle_match_in_play(
        &self,
        cm: &ColossusMatch,
        m: &Match,
    ) -> Result<ColossusMatchStatus> {
        let exchange_id = cm.exchange_id();
        match m.internal_status {
            MatchInternalStatus::Abandoned | MatchInternalStatus::Cancelled => {
                self.exchange.abandon_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::Abandoned)
            }
            MatchInternalStatus::Delayed
            | MatchInternalStatus::Scheduled
            | MatchInternalStatus::Postponed => {
                self.exchange.reverse_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::NotStarted)
            }
            MatchInternalStatus::Finished => {
                let results = esb_convert::to_event_results(cm, m);
                self.exchange
                    .update_event_results(&exchange_id, &results)
                    .await?;
                self.exchange
                    .progress_sport_event(
                        &exchange_id,
                        SportEventStatus::InPlay,
                        SportEventStatus::Completed,
                    )
                    .await?;
                Ok(ColossusMatchStatus::Completed)
            }
            MatchInternalStatus::Closed => {
                let results = esb_convert::to_event_results(cm, m);
                self.exchange
                    .update_event_results(&exchange_id, &results)
                    .await?;
                self.exchange
                    .progress_sport_event(
                        &exchange_id,
                        SportEventStatus::InPlay,
                        SportEventStatus::Completed,
                    )
                    .await?;
                self.exchange
                    .progress_sport_event(
                        &exchange_id,
                        SportEventStatus::Completed,
                        SportEventStatus::Official,
                    )
                    .await?;
                Ok(ColossusMatchStatus::Official)
            }
            _ => Ok(ColossusMatchStatus::InPlay),
        }
    }

    async fn handle_match_completed(
        &self,
        cm: &ColossusMatch,
        m: &Match,
    ) -> Result<ColossusMatchStatus> {
        let exchange_id = cm.exchange_id();
        match m.internal_status {
            MatchInternalStatus::Abandoned | MatchInternalStatus::Cancelled => {
                self.exchange.abandon_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::Abandoned)
            }
            // Back to scheduling: two reversals unwind Completed and InPlay.
            MatchInternalStatus::Delayed
            | MatchInternalStatus::Scheduled
            | MatchInternalStatus::Interrupted => {
                self.exchange.reverse_sport_event(&exchange_id).await?;
                self.exchange.reverse_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::NotStarted)
            }
            MatchInternalStatus::InProgress => {
                self.exchange.reverse_sport_event(&exchange_id).await?;
                Ok(ColossusMatchStatus::InPlay)
            }
            MatchInternalStatus::Closed => {
                self.exchange
                    .progress_sport_event(
                        &exchange_id,
                        SportEventStatus::Completed,
                        SportEventStatus::Official,
                    )
                    .await?;
                Ok(ColossusMatchStatus::Official)
            }
            _ => Ok(ColossusMatchStatus::Completed),
        }
    }
}
