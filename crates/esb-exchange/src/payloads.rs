use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::status::ExchangePoolType;

/// Body of `POST /pools` (sent wrapped as `{"pool": ...}`).
#[derive(Debug, Clone, Serialize)]
pub struct PoolCreatePayload {
    pub ext_id: String,
    pub sport_code: String,
    pub name_code: String,
    pub type_code: ExchangePoolType,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_unit_per_line: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_unit_per_line: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_unit_per_ticket: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_unit_per_ticket: Decimal,
    pub currency: String,
    pub num_legs: usize,
    #[serde(rename = "legs_attributes")]
    pub legs: Vec<PoolLegPayload>,
    #[serde(rename = "pool_prizes_attributes")]
    pub pool_prizes: Vec<PoolPrizePayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolLegPayload {
    pub leg_order: usize,
    pub sport_event_ext_id: String,
    #[serde(
        rename = "ou_threshold",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub over_under_threshold: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolPrizePayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub guarantee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub carry_in: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub allocation: Decimal,
    pub prize_type_code: String,
}

/// Body of `POST /sport_events` (sent wrapped as `{"sport_event": ...}`).
#[derive(Debug, Clone, Serialize)]
pub struct SportEventPayload {
    pub ext_id: String,
    pub name: String,
    pub sport_sub_code: String,
    pub scheduled_start: DateTime<Utc>,
    pub venue: String,
    #[serde(rename = "sport_event_competitors_attributes")]
    pub competitors: Vec<SportEventCompetitorPayload>,
    pub add_info_json: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SportEventCompetitorPayload {
    pub ext_id: String,
    pub name: String,
    pub display_order: usize,
    pub cloth_number: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub decimal_odds: Decimal,
    pub fractional_odds: String,
    pub withdrawn: bool,
    pub add_info_json: String,
}

/// Body of `PUT /sport_events/{id}/probabilities` (sent unwrapped).
#[derive(Debug, Clone, Serialize)]
pub struct EventProbabilitiesPayload {
    pub markets: Vec<EventMarket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventMarket {
    pub type_code: ExchangePoolType,
    // H2H carries 3 selections (home/draw/away), over/under carries one per
    // competitor.
    #[serde(rename = "selections_attributes")]
    pub selections: Vec<MarketSelection>,
    pub pool_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketSelection {
    pub selection_order: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub probability: Decimal,
}

/// Body of `PUT /sport_events/{id}/result` (sent wrapped as `{"results": ...}`).
#[derive(Debug, Clone, Serialize)]
pub struct EventResultsPayload {
    #[serde(rename = "sport_event_competitors_attributes")]
    pub results: Vec<CompetitorResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorResult {
    pub ext_id: String,
    pub result: i32,
}
