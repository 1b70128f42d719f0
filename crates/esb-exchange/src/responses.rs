use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::status::{ExchangePoolStatus, SportEventStatus};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenericResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /pools/{id}`.
///
/// `settled_at` being present overrides whatever `status` reports: the pool
/// has been settled, full stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolStatusResponse {
    #[serde(default)]
    pub status: Option<ExchangePoolStatus>,
    #[serde(default)]
    pub settlement_status: Option<String>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
}

/// Response of `GET /sport_events/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportEventStatusResponse {
    #[serde(default)]
    pub status: Option<SportEventStatus>,
    #[serde(default)]
    pub period: Option<i32>,
}
