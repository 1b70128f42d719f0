use serde::{Deserialize, Serialize};

/// Sport code every pool is filed under.
pub const SPORT_CODE_ESPORTS: &str = "ESPORTS";

/// Venue string the exchange requires on sport events.
pub const VENUE_ESPORTS_ARENA: &str = "esports_arena";

/// Prize type code of the main win pot.
pub const PRIZE_TYPE_WIN: &str = "WIN";
/// Prize type codes of the up-to-three consolation tiers, in order.
pub const PRIZE_TYPE_CONSOLATIONS: [&str; 3] = ["CON_N1", "CON_N2", "CON_N3"];

/// Pool type vocabulary on the exchange side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangePoolType {
    #[serde(rename = "H2H")]
    HeadToHead,
    #[serde(rename = "OVER_UNDER")]
    OverUnder,
}

/// Pool lifecycle vocabulary on the exchange side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangePoolStatus {
    Created,
    Open,
    InPlay,
    Official,
    Abandoned,
}

/// Sport event lifecycle vocabulary on the exchange side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportEventStatus {
    NotStarted,
    InPlay,
    Completed,
    Official,
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms_match_exchange_vocabulary() {
        assert_eq!(
            serde_json::to_string(&ExchangePoolType::HeadToHead).unwrap(),
            "\"H2H\""
        );
        assert_eq!(
            serde_json::to_string(&ExchangePoolType::OverUnder).unwrap(),
            "\"OVER_UNDER\""
        );
        assert_eq!(
            serde_json::to_string(&SportEventStatus::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
        assert_eq!(
            serde_json::from_str::<ExchangePoolStatus>("\"IN_PLAY\"").unwrap(),
            ExchangePoolStatus::InPlay
        );
    }
}
