//! Eligibility checks applied before records are offered to the exchange.
//!
//! Failures here are data conditions, not process errors; callers redirect
//! the entity (NeedsApproval, Abandoned, leg deletion) or skip pool
//! creation rather than aborting the pass.

use anyhow::{bail, Result};
use chrono::{Duration, Utc};

use esb_db::FeedStore;
use esb_models::{Game, Match, MatchFormat};

/// Pool sizes the exchange accepts.
pub const VALID_LEG_COUNTS: [usize; 4] = [4, 6, 8, 10];

/// Hours ahead of now within which the earliest match must start for a
/// pool to be generated.
pub const ADVANCE_WINDOW_HOURS: i64 = 48;

pub fn leg_count(count: usize) -> Result<()> {
    if !VALID_LEG_COUNTS.contains(&count) {
        bail!("only pools with 4/6/8/10 legs can be sent to the exchange");
    }
    Ok(())
}

/// The earliest match of the stage must start within the advance window.
/// Matches are expected in ascending start-time order.
pub fn starts_within_window(matches: &[Match]) -> Result<()> {
    let Some(first) = matches.first() else {
        bail!("need at least one match to validate the advance window");
    };
    if first.start_time > Utc::now() + Duration::hours(ADVANCE_WINDOW_HOURS) {
        bail!(
            "earliest scheduled match must be within the next {} hours",
            ADVANCE_WINDOW_HOURS
        );
    }
    Ok(())
}

/// Every match format appearing in the stage must have an over/under
/// default row for the game, otherwise no threshold can be derived.
pub async fn over_under_coverage<S: FeedStore>(
    store: &S,
    game: Game,
    matches: &[Match],
) -> Result<()> {
    let mut formats: Vec<MatchFormat> = Vec::new();
    for m in matches {
        if !formats.contains(&m.format) {
            formats.push(m.format);
        }
    }

    let covered = store.over_under_defaults_count(game, &formats).await?;
    if covered != formats.len() as i64 {
        bail!("an unknown match format is present in the list of matches");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use esb_models::{MatchInternalStatus, MatchFormat};
    use uuid::Uuid;

    fn scheduled_match(starts_in_hours: i64) -> Match {
        Match {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            event_stage: "group_a".into(),
            format: MatchFormat::BestOf3,
            start_time: Utc::now() + Duration::hours(starts_in_hours),
            internal_status: MatchInternalStatus::Scheduled,
            competitors: Vec::new(),
            win_probabilities: HashMap::new(),
            scores: HashMap::new(),
            ou_scores: HashMap::new(),
        }
    }

    #[test]
    fn leg_count_accepts_exchange_sizes_only() {
        for count in VALID_LEG_COUNTS {
            assert!(leg_count(count).is_ok());
        }
        for count in [0, 1, 3, 5, 7, 9, 11, 12] {
            assert!(leg_count(count).is_err());
        }
    }

    #[test]
    fn window_checks_earliest_match_only() {
        assert!(starts_within_window(&[scheduled_match(2), scheduled_match(200)]).is_ok());
        assert!(starts_within_window(&[scheduled_match(72)]).is_err());
        assert!(starts_within_window(&[]).is_err());
    }
}
