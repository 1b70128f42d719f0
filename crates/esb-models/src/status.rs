use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Status of a match as tracked by the internal esports feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchInternalStatus {
    Scheduled,
    InProgress,
    Postponed,
    Suspended,
    Delayed,
    Cancelled,
    Abandoned,
    Interrupted,
    Finished,
    Closed,
    Unknown,
}

impl MatchInternalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Postponed => "postponed",
            Self::Suspended => "suspended",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
            Self::Abandoned => "abandoned",
            Self::Interrupted => "interrupted",
            Self::Finished => "finished",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "postponed" => Ok(Self::Postponed),
            "suspended" => Ok(Self::Suspended),
            "delayed" => Ok(Self::Delayed),
            "cancelled" => Ok(Self::Cancelled),
            "abandoned" => Ok(Self::Abandoned),
            "interrupted" => Ok(Self::Interrupted),
            "finished" => Ok(Self::Finished),
            "closed" => Ok(Self::Closed),
            "unknown" => Ok(Self::Unknown),
            other => Err(anyhow!("invalid match internal status '{other}'")),
        }
    }
}

/// Wagering product type. The exchange-side vocabulary lives in
/// `esb-exchange`; this is the internal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    H2h,
    OverUnder,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H2h => "h2h",
            Self::OverUnder => "over_under",
        }
    }

    /// Short code used inside deterministic exchange identifiers
    /// (`{match_id}-H2H` / `{match_id}-OU`).
    pub fn exchange_suffix(&self) -> &'static str {
        match self {
            Self::H2h => "H2H",
            Self::OverUnder => "OU",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "h2h" => Ok(Self::H2h),
            "over_under" => Ok(Self::OverUnder),
            other => Err(anyhow!("invalid pool type '{other}'")),
        }
    }
}

/// Lifecycle of a pool as mirrored against the exchange.
///
/// Progress is forward-only except the explicit Abandoned edge; `Settled`
/// and `Abandoned` are terminal, `SyncError` is retried on the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSyncStatus {
    NotReady,
    NeedsApproval,
    Approved,
    Created,
    Visible,
    TradingOpen,
    TradingClosed,
    Official,
    Settled,
    Abandoned,
    SyncError,
}

impl PoolSyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::NeedsApproval => "needs_approval",
            Self::Approved => "approved",
            Self::Created => "created",
            Self::Visible => "visible",
            Self::TradingOpen => "trading_open",
            Self::TradingClosed => "trading_closed",
            Self::Official => "official",
            Self::Settled => "settled",
            Self::Abandoned => "abandoned",
            Self::SyncError => "sync_error",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "not_ready" => Ok(Self::NotReady),
            "needs_approval" => Ok(Self::NeedsApproval),
            "approved" => Ok(Self::Approved),
            "created" => Ok(Self::Created),
            "visible" => Ok(Self::Visible),
            "trading_open" => Ok(Self::TradingOpen),
            "trading_closed" => Ok(Self::TradingClosed),
            "official" => Ok(Self::Official),
            "settled" => Ok(Self::Settled),
            "abandoned" => Ok(Self::Abandoned),
            "sync_error" => Ok(Self::SyncError),
            other => Err(anyhow!("invalid pool sync status '{other}'")),
        }
    }
}

/// Remote status of a (match, pool type) pair as last reconciled with the
/// exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColossusMatchStatus {
    Unknown,
    NotStarted,
    InPlay,
    Completed,
    Official,
    Abandoned,
    SyncError,
}

impl ColossusMatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotStarted => "not_started",
            Self::InPlay => "in_play",
            Self::Completed => "completed",
            Self::Official => "official",
            Self::Abandoned => "abandoned",
            Self::SyncError => "sync_error",
        }
    }

    /// `Official` and `Abandoned` rows are never resynced or advanced again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Official | Self::Abandoned)
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "not_started" => Ok(Self::NotStarted),
            "in_play" => Ok(Self::InPlay),
            "completed" => Ok(Self::Completed),
            "official" => Ok(Self::Official),
            "abandoned" => Ok(Self::Abandoned),
            "sync_error" => Ok(Self::SyncError),
            other => Err(anyhow!("invalid colossus match status '{other}'")),
        }
    }
}

/// Games the feed knows how to price and settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    Csgo,
    Dota2,
    LeagueOfLegends,
}

impl Game {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csgo => "csgo",
            Self::Dota2 => "dota_2",
            Self::LeagueOfLegends => "league_of_legends",
        }
    }

    /// Code sent to the exchange as the pool name / sport sub code.
    pub fn exchange_code(&self) -> &'static str {
        match self {
            Self::Csgo => "CSGO",
            Self::Dota2 => "DOTA_2",
            Self::LeagueOfLegends => "LEAGUE_OF_LEGENDS",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "csgo" => Ok(Self::Csgo),
            "dota_2" => Ok(Self::Dota2),
            "league_of_legends" => Ok(Self::LeagueOfLegends),
            other => Err(anyhow!("invalid game '{other}'")),
        }
    }
}

/// Series format of a match; drives over/under default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    BestOf1,
    BestOf3,
    BestOf5,
}

impl MatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestOf1 => "best_of_1",
            Self::BestOf3 => "best_of_3",
            Self::BestOf5 => "best_of_5",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "best_of_1" => Ok(Self::BestOf1),
            "best_of_3" => Ok(Self::BestOf3),
            "best_of_5" => Ok(Self::BestOf5),
            other => Err(anyhow!("invalid match format '{other}'")),
        }
    }
}

/// Currency a pool is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolCurrency {
    Str,
    Usd,
}

impl PoolCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Usd => "USD",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "STR" => Ok(Self::Str),
            "USD" => Ok(Self::Usd),
            other => Err(anyhow!("invalid pool currency '{other}'")),
        }
    }
}
